//! Polls ADC channels 1-3 on a Raspberry Pi and prints each reading.

#[cfg(feature = "raspberry_pi")]
fn main() -> Result<(), anyhow::Error> {
    use std::time::Duration;

    use ads1015::{Ads1015, DataRate, Gain};
    use rppal::hal::Delay;
    use rppal::i2c::I2c;

    const CHANNELS: [u8; 3] = [1, 2, 3];

    let i2c = I2c::new()?;

    let mut adc = Ads1015::new(i2c, Delay::new());

    adc.begin(DataRate::Sps250)?;
    adc.set_gain(1, Gain::TwoThirds)?;

    let mut samples = [0u16; CHANNELS.len()];

    loop {
        adc.read_data(&CHANNELS, &mut samples)?;

        for (channel, sample) in CHANNELS.iter().zip(samples) {
            println!("Channel {channel}: {sample}");
        }

        std::thread::sleep(Duration::from_millis(500));
    }
}

#[cfg(not(feature = "raspberry_pi"))]
fn main() {
    eprintln!("voltpi does nothing without the raspberry_pi feature");
    std::process::exit(1);
}
