//! Layout of the 16-bit configuration register.
//!
//! Fields, MSB to LSB:
//! `[OS:1][MUX:3][PGA:3][MODE:1][DR:3][COMP_MODE:1][COMP_POL:1][COMP_LAT:1][COMP_QUE:2]`
//!
//! Every field occupies a disjoint bit range, so a configuration word is the
//! plain OR of its fields.

/// Register pointer values.
pub(crate) mod reg {
    /// Conversion result, 2 bytes big-endian, top 12 bits significant.
    pub const CONVERT: u8 = 0x00;
    /// Configuration register.
    pub const CONFIG: u8 = 0x01;
}

/// Starts a single conversion when written. Self-clears once the conversion
/// is under way, so readback comparisons must mask it out.
pub(crate) const OS_SINGLE: u16 = 0x8000;

/// Single-shot conversion mode.
const MODE_SINGLE: u16 = 0x0100;

/// Comparator disabled (COMP_QUE = 0b11). The other comparator fields stay
/// at their zero defaults: traditional mode, active-low, non-latching.
const COMP_DISABLE: u16 = 0x0003;

/// Mux codes for the four single-ended inputs, indexed by channel.
pub(crate) const MUX_SINGLE: [u16; 4] = [0x4000, 0x5000, 0x6000, 0x7000];

/// Samples-per-second setting, the DR field of the configuration register.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DataRate {
    Sps128,
    Sps250,
    Sps490,
    Sps920,
    Sps1600,
    Sps2400,
    /// Power-on default of the chip.
    #[default]
    Sps3300,
}

impl DataRate {
    pub(crate) fn bits(self) -> u16 {
        match self {
            Self::Sps128 => 0x0000,
            Self::Sps250 => 0x0020,
            Self::Sps490 => 0x0040,
            Self::Sps920 => 0x0060,
            Self::Sps1600 => 0x0080,
            Self::Sps2400 => 0x00A0,
            Self::Sps3300 => 0x00C0,
        }
    }

    /// Nominal rate in samples per second.
    pub fn samples_per_second(self) -> u32 {
        match self {
            Self::Sps128 => 128,
            Self::Sps250 => 250,
            Self::Sps490 => 490,
            Self::Sps920 => 920,
            Self::Sps1600 => 1600,
            Self::Sps2400 => 2400,
            Self::Sps3300 => 3300,
        }
    }

    /// Time budget for one single-shot conversion, in microseconds.
    /// Rounded up so the wait never undershoots the conversion.
    pub fn conversion_wait_us(self) -> u32 {
        1_000_000u32.div_ceil(self.samples_per_second())
    }
}

/// Programmable gain amplifier setting, the PGA field of the configuration
/// register. Variants are named by gain factor; the full-scale input range
/// shrinks as the gain grows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Gain {
    /// ±6.144 V full scale.
    TwoThirds,
    /// ±4.096 V full scale. Default.
    #[default]
    One,
    /// ±2.048 V full scale.
    Two,
    /// ±1.024 V full scale.
    Four,
    /// ±0.512 V full scale.
    Eight,
    /// ±0.256 V full scale.
    Sixteen,
}

impl Gain {
    pub(crate) fn bits(self) -> u16 {
        match self {
            Self::TwoThirds => 0x0000,
            Self::One => 0x0200,
            Self::Two => 0x0400,
            Self::Four => 0x0600,
            Self::Eight => 0x0800,
            Self::Sixteen => 0x0A00,
        }
    }

    /// Full-scale input range in millivolts.
    pub fn full_scale_mv(self) -> u32 {
        match self {
            Self::TwoThirds => 6144,
            Self::One => 4096,
            Self::Two => 2048,
            Self::Four => 1024,
            Self::Eight => 512,
            Self::Sixteen => 256,
        }
    }
}

/// Packs mux, gain, rate and the fixed mode/comparator fields into one
/// register value with the one-shot trigger bit set.
pub(crate) fn build_config(mux: u16, gain: Gain, rate: DataRate) -> u16 {
    COMP_DISABLE | rate.bits() | MODE_SINGLE | gain.bits() | mux | OS_SINGLE
}

#[cfg(test)]
mod tests {
    use super::*;

    const MUX_MASK: u16 = 0x7000;
    const PGA_MASK: u16 = 0x0E00;
    const DR_MASK: u16 = 0x00E0;

    const ALL_RATES: [DataRate; 7] = [
        DataRate::Sps128,
        DataRate::Sps250,
        DataRate::Sps490,
        DataRate::Sps920,
        DataRate::Sps1600,
        DataRate::Sps2400,
        DataRate::Sps3300,
    ];

    const ALL_GAINS: [Gain; 6] = [
        Gain::TwoThirds,
        Gain::One,
        Gain::Two,
        Gain::Four,
        Gain::Eight,
        Gain::Sixteen,
    ];

    #[test]
    fn mux_field_round_trips_every_channel() {
        for channel in 0..4 {
            let word = build_config(MUX_SINGLE[channel], Gain::default(), DataRate::default());
            let mux = word & MUX_MASK;
            assert_eq!(MUX_SINGLE.iter().position(|&m| m == mux), Some(channel));
        }
    }

    #[test]
    fn gain_field_is_independent_of_channel_and_rate() {
        for gain in ALL_GAINS {
            for channel in 0..4 {
                for rate in ALL_RATES {
                    let word = build_config(MUX_SINGLE[channel], gain, rate);
                    assert_eq!(word & PGA_MASK, gain.bits());
                }
            }
        }
    }

    #[test]
    fn rate_codes_are_distinct_and_stay_in_field() {
        for (i, a) in ALL_RATES.iter().enumerate() {
            assert_eq!(a.bits() & !DR_MASK, 0);
            for b in &ALL_RATES[i + 1..] {
                assert_ne!(a.bits(), b.bits());
            }
        }
    }

    #[test]
    fn conversion_wait_rounds_up() {
        let expected = [
            (DataRate::Sps128, 7813),
            (DataRate::Sps250, 4000),
            (DataRate::Sps490, 2041),
            (DataRate::Sps920, 1087),
            (DataRate::Sps1600, 625),
            (DataRate::Sps2400, 417),
            (DataRate::Sps3300, 304),
        ];

        for (rate, wait_us) in expected {
            assert_eq!(rate.conversion_wait_us(), wait_us);
        }
    }

    #[test]
    fn fixed_fields_select_single_shot_with_comparator_off() {
        let word = build_config(MUX_SINGLE[0], Gain::One, DataRate::Sps3300);

        assert_eq!(word & 0x0003, 0x0003, "comparator queue disabled");
        assert_eq!(word & 0x001C, 0x0000, "comparator defaults");
        assert_eq!(word & 0x0100, 0x0100, "single-shot mode");
        assert_eq!(word & 0x8000, 0x8000, "conversion triggered");
    }
}
