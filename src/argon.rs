//! Spectroscopic data for the argon de-excitation cascade.
//!
//! Transition rates (unless indicated otherwise) are taken from the
//! NIST Atomic Spectra Database. Rates for lines missing there are from
//! Zatsarinny and Bartschat, J. Phys. B 39 (2006), 2145. Oscillator
//! strengths not in the NIST database are from Berkowitz, Atomic and
//! Molecular Photoabsorption (2002), and Lee and Lu, Phys. Rev. A 8
//! (1973), 1241.
//!
//! All transition rates are in ns^-1, two-body rate constants in
//! cm^3 ns^-1 and three-body rate constants in cm^6 ns^-1.

/// Radiative transition rate of one channel.
#[derive(Clone, Copy, Debug)]
pub(crate) enum RadRate {
    /// Tabulated rate [ns^-1].
    Fixed(f64),
    /// Computed from the oscillator strength and the level energy.
    FromOscillator,
}

/// Destination of a de-excitation channel.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Target {
    /// Another excited level, identified by its spectroscopic token.
    Level(&'static str),
    /// The atomic ground state.
    Ground,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChannelKind {
    Radiative,
    CollIon,
    CollNonIon,
}

/// One tabulated de-excitation channel.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StaticChannel {
    pub kind: ChannelKind,
    pub rate: RadRate,
    pub dest: Target,
}

const fn rad(rate: f64, dest: &'static str) -> StaticChannel {
    StaticChannel {
        kind: ChannelKind::Radiative,
        rate: RadRate::Fixed(rate),
        dest: Target::Level(dest),
    }
}

const fn rad_ground(rate: f64) -> StaticChannel {
    StaticChannel {
        kind: ChannelKind::Radiative,
        rate: RadRate::Fixed(rate),
        dest: Target::Ground,
    }
}

const fn rad_osc() -> StaticChannel {
    StaticChannel {
        kind: ChannelKind::Radiative,
        rate: RadRate::FromOscillator,
        dest: Target::Ground,
    }
}

const fn spread(dest: &'static str) -> StaticChannel {
    StaticChannel {
        kind: ChannelKind::CollNonIon,
        rate: RadRate::Fixed(100.0),
        dest: Target::Level(dest),
    }
}

/// One argon level: spectroscopic token, oscillator strength (0 for
/// non-resonant levels) and its tabulated channels.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ArLevelData {
    pub token: &'static str,
    pub osc: f64,
    pub channels: &'static [StaticChannel],
}

const fn lvl(
    token: &'static str,
    osc: f64,
    channels: &'static [StaticChannel],
) -> ArLevelData {
    ArLevelData {
        token,
        osc,
        channels,
    }
}

/// Argon levels in arena order. The "HIGH" entry is an artificial level
/// standing in for the sum of higher J = 1 states; its cascade is
/// simulated by allocating it with equal probability to one of the five
/// nearest levels below.
pub(crate) static AR_LEVELS: &[ArLevelData] = &[
    // 4s levels. 1S5 and 1S3 are metastable.
    lvl("1S5", 0.0, &[]),
    lvl("1S4", 0.0609, &[rad_ground(0.119)]),
    lvl("1S3", 0.0, &[]),
    lvl("1S2", 0.25, &[rad_ground(0.51)]),
    // 4p levels
    lvl(
        "2P10",
        0.0,
        &[
            rad(0.0189, "1S5"),
            rad(5.43e-3, "1S4"),
            rad(9.8e-4, "1S3"),
            rad(1.9e-4, "1S2"),
        ],
    ),
    lvl("2P9", 0.0, &[rad(0.0331, "1S5")]),
    lvl(
        "2P8",
        0.0,
        &[rad(9.28e-3, "1S5"), rad(0.0215, "1S4"), rad(1.47e-3, "1S2")],
    ),
    lvl(
        "2P7",
        0.0,
        &[
            rad(5.18e-3, "1S5"),
            rad(0.025, "1S4"),
            rad(2.43e-3, "1S3"),
            rad(1.06e-3, "1S2"),
        ],
    ),
    lvl(
        "2P6",
        0.0,
        &[rad(0.0245, "1S5"), rad(4.9e-3, "1S4"), rad(5.03e-3, "1S2")],
    ),
    lvl("2P5", 0.0, &[rad(0.0402, "1S4")]),
    lvl(
        "2P4",
        0.0,
        &[
            rad(6.25e-4, "1S5"),
            rad(2.2e-5, "1S4"),
            rad(0.0186, "1S3"),
            rad(0.0139, "1S2"),
        ],
    ),
    lvl(
        "2P3",
        0.0,
        &[rad(3.8e-3, "1S5"), rad(8.47e-3, "1S4"), rad(0.0223, "1S2")],
    ),
    lvl(
        "2P2",
        0.0,
        &[
            rad(6.39e-3, "1S5"),
            rad(1.83e-3, "1S4"),
            rad(0.0117, "1S3"),
            rad(0.0153, "1S2"),
        ],
    ),
    lvl("2P1", 0.0, &[rad(2.36e-4, "1S4"), rad(0.0445, "1S2")]),
    // 3d and 5s levels
    lvl(
        "3D6",
        0.0,
        &[
            rad(8.1e-3, "2P10"),
            rad(7.73e-4, "2P7"),
            rad(1.2e-4, "2P4"),
            rad(3.6e-4, "2P2"),
        ],
    ),
    lvl(
        "3D5",
        0.0011,
        &[
            rad(7.4e-3, "2P10"),
            rad(3.9e-5, "2P8"),
            rad(3.09e-4, "2P7"),
            rad(1.37e-3, "2P6"),
            rad(5.75e-4, "2P5"),
            rad(3.2e-5, "2P4"),
            rad(1.4e-4, "2P3"),
            rad(1.7e-4, "2P2"),
            rad(2.49e-6, "2P1"),
            rad_osc(),
        ],
    ),
    lvl(
        "3D3",
        0.0,
        &[
            rad(4.9e-3, "2P10"),
            rad(9.82e-5, "2P9"),
            rad(1.2e-4, "2P8"),
            rad(2.6e-4, "2P7"),
            rad(2.5e-3, "2P6"),
            rad(9.41e-5, "2P4"),
            rad(3.9e-4, "2P3"),
            rad(1.1e-4, "2P2"),
        ],
    ),
    lvl("3D4!", 0.0, &[rad(0.01593, "2P9")]),
    lvl(
        "3D4",
        0.0,
        &[
            rad(2.29e-3, "2P9"),
            rad(0.011, "2P8"),
            rad(8.8e-5, "2P6"),
            rad(2.53e-6, "2P3"),
        ],
    ),
    lvl(
        "3D1!!",
        0.0,
        &[
            rad(5.85e-6, "2P10"),
            rad(1.2e-4, "2P9"),
            rad(5.7e-3, "2P8"),
            rad(7.3e-3, "2P7"),
            rad(2.0e-4, "2P6"),
            rad(1.54e-6, "2P4"),
            rad(2.08e-5, "2P3"),
            rad(6.75e-7, "2P2"),
        ],
    ),
    lvl(
        "2S5",
        0.0,
        &[
            rad(4.9e-3, "2P10"),
            rad(0.011, "2P9"),
            rad(1.1e-3, "2P8"),
            rad(4.6e-4, "2P7"),
            rad(3.3e-3, "2P6"),
            rad(5.9e-5, "2P4"),
            rad(1.2e-4, "2P3"),
            rad(3.1e-4, "2P2"),
        ],
    ),
    lvl(
        "2S4",
        0.027,
        &[
            rad_ground(0.077),
            rad(2.44e-3, "2P10"),
            rad(8.9e-3, "2P8"),
            rad(4.6e-3, "2P7"),
            rad(2.7e-3, "2P6"),
            rad(1.3e-3, "2P5"),
            rad(4.5e-4, "2P4"),
            rad(2.9e-5, "2P3"),
            rad(3.0e-5, "2P2"),
            rad(1.6e-4, "2P1"),
        ],
    ),
    lvl(
        "3D1!",
        0.0,
        &[
            rad(3.1e-3, "2P9"),
            rad(2.0e-3, "2P8"),
            rad(0.015, "2P6"),
            rad(9.8e-6, "2P3"),
        ],
    ),
    lvl(
        "3D2",
        0.0932,
        &[
            rad_ground(0.27),
            rad(1.35e-5, "2P10"),
            rad(9.52e-4, "2P8"),
            rad(0.011, "2P7"),
            rad(4.01e-5, "2P6"),
            rad(4.3e-3, "2P5"),
            rad(8.96e-4, "2P4"),
            rad(4.45e-5, "2P3"),
            rad(5.87e-5, "2P2"),
            rad(8.77e-4, "2P1"),
        ],
    ),
    lvl(
        "3S1!!!!",
        0.0,
        &[
            rad(7.51e-6, "2P10"),
            rad(4.3e-5, "2P9"),
            rad(8.3e-4, "2P8"),
            rad(5.01e-5, "2P7"),
            rad(2.09e-4, "2P6"),
            rad(0.013, "2P4"),
            rad(2.2e-3, "2P3"),
            rad(3.35e-6, "2P2"),
        ],
    ),
    lvl(
        "3S1!!",
        0.0,
        &[
            rad(1.89e-4, "2P10"),
            rad(1.52e-4, "2P9"),
            rad(7.21e-4, "2P8"),
            rad(3.69e-4, "2P7"),
            rad(3.76e-3, "2P6"),
            rad(1.72e-4, "2P4"),
            rad(5.8e-4, "2P3"),
            rad(6.2e-3, "2P2"),
        ],
    ),
    lvl(
        "3S1!!!",
        0.0,
        &[
            rad(7.36e-4, "2P9"),
            rad(4.2e-5, "2P8"),
            rad(9.3e-5, "2P6"),
            rad(0.015, "2P3"),
        ],
    ),
    lvl(
        "2S3",
        0.0,
        &[
            rad(3.26e-3, "2P10"),
            rad(2.22e-3, "2P7"),
            rad(0.01, "2P4"),
            rad(5.1e-3, "2P2"),
        ],
    ),
    lvl(
        "2S2",
        0.0119,
        &[
            rad_ground(0.035),
            rad(1.76e-3, "2P10"),
            rad(2.1e-4, "2P8"),
            rad(2.8e-4, "2P7"),
            rad(1.39e-3, "2P6"),
            rad(3.8e-4, "2P5"),
            rad(2.0e-3, "2P4"),
            rad(8.9e-3, "2P3"),
            rad(3.4e-3, "2P2"),
            rad(1.9e-3, "2P1"),
        ],
    ),
    lvl(
        "3S1!",
        0.106,
        &[
            rad_ground(0.313),
            rad(2.05e-5, "2P10"),
            rad(8.33e-5, "2P8"),
            rad(3.9e-4, "2P7"),
            rad(3.96e-4, "2P6"),
            rad(4.2e-4, "2P5"),
            rad(4.5e-3, "2P4"),
            rad(4.84e-5, "2P3"),
            rad(7.1e-3, "2P2"),
            rad(5.2e-3, "2P1"),
        ],
    ),
    // Higher resonance levels
    lvl(
        "4D5",
        0.0019,
        &[
            rad(2.78e-3, "2P10"),
            rad(2.8e-4, "2P8"),
            rad(8.6e-4, "2P6"),
            rad(9.2e-4, "2P5"),
            rad(4.6e-4, "2P3"),
            rad(1.6e-4, "2P2"),
            rad_osc(),
        ],
    ),
    lvl(
        "3S4",
        0.0144,
        &[
            rad(4.21e-4, "2P10"),
            rad(2.0e-3, "2P8"),
            rad(1.7e-3, "2P7"),
            rad(7.2e-4, "2P6"),
            rad(3.5e-4, "2P5"),
            rad(1.2e-4, "2P4"),
            rad(4.2e-6, "2P3"),
            rad(3.3e-5, "2P2"),
            rad(9.7e-5, "2P1"),
            rad_osc(),
        ],
    ),
    lvl("4D2", 0.048, &[rad(1.7e-4, "2P7"), rad_osc()]),
    lvl(
        "4S1!",
        0.0209,
        &[
            rad(1.05e-3, "2P10"),
            rad(3.1e-5, "2P8"),
            rad(2.5e-5, "2P7"),
            rad(4.0e-4, "2P6"),
            rad(5.8e-5, "2P5"),
            rad(1.2e-4, "2P3"),
            rad_osc(),
        ],
    ),
    lvl(
        "3S2",
        0.0221,
        &[
            rad(2.85e-4, "2P10"),
            rad(5.1e-5, "2P8"),
            rad(5.3e-5, "2P7"),
            rad(1.6e-4, "2P6"),
            rad(1.5e-4, "2P5"),
            rad(6.0e-4, "2P4"),
            rad(2.48e-3, "2P3"),
            rad(9.6e-4, "2P2"),
            rad(3.59e-4, "2P1"),
            rad_osc(),
        ],
    ),
    lvl(
        "5D5",
        0.0041,
        &[
            rad(2.2e-3, "2P10"),
            rad(1.1e-4, "2P8"),
            rad(7.6e-5, "2P7"),
            rad(4.2e-4, "2P6"),
            rad(2.4e-4, "2P5"),
            rad(2.1e-4, "2P4"),
            rad(2.4e-4, "2P3"),
            rad(1.2e-4, "2P2"),
            rad_osc(),
        ],
    ),
    lvl(
        "4S4",
        0.0139,
        &[
            rad(1.9e-4, "2P10"),
            rad(1.1e-3, "2P8"),
            rad(5.2e-4, "2P7"),
            rad(5.1e-4, "2P6"),
            rad(9.4e-5, "2P5"),
            rad(5.4e-5, "2P4"),
            rad_osc(),
        ],
    ),
    lvl(
        "5D2",
        0.0426,
        &[
            rad(5.9e-5, "2P8"),
            rad(9.0e-6, "2P7"),
            rad(1.5e-4, "2P5"),
            rad(3.1e-5, "2P2"),
            rad_osc(),
        ],
    ),
    lvl(
        "6D5",
        0.00075,
        &[
            rad(1.9e-3, "2P10"),
            rad(4.2e-4, "2P6"),
            rad(3.0e-4, "2P5"),
            rad(5.1e-5, "2P4"),
            rad(6.6e-5, "2P3"),
            rad(1.21e-4, "2P1"),
            rad_osc(),
        ],
    ),
    lvl("5S1!", 0.00051, &[rad(7.7e-5, "2P5"), rad_osc()]),
    lvl(
        "4S2",
        0.00074,
        &[
            rad(4.5e-4, "2P10"),
            rad(2.0e-4, "2P8"),
            rad(2.1e-4, "2P7"),
            rad(1.2e-4, "2P5"),
            rad(1.8e-4, "2P4"),
            rad(9.0e-4, "2P3"),
            rad(3.3e-4, "2P2"),
            rad_osc(),
        ],
    ),
    // Berkowitz estimates f = 0.0211 for the sum of all ns levels with
    // n = 8 and higher (Lee and Lu give 0.0130 for 5s alone).
    lvl(
        "5S4",
        0.0211,
        &[
            rad(3.6e-4, "2P8"),
            rad(1.2e-4, "2P6"),
            rad(1.5e-4, "2P4"),
            rad(1.4e-4, "2P3"),
            rad(7.5e-5, "2P2"),
            rad_osc(),
        ],
    ),
    // Berkowitz estimates f = 0.0574 for the sum of all strong nd
    // levels with n = 6 and higher (Lee and Lu give 0.0290).
    lvl("6D2", 0.0574, &[rad(3.33e-3, "2P7"), rad_osc()]),
    lvl(
        "HIGH",
        0.0,
        &[
            spread("6D5"),
            spread("5S1!"),
            spread("4S2"),
            spread("5S4"),
            spread("6D2"),
        ],
    ),
];

pub(crate) fn ar_level_data(token: &str) -> Option<&'static ArLevelData> {
    AR_LEVELS.iter().find(|l| l.token == token)
}

/// Energy assigned to the artificial dimer and excimer levels [eV].
pub(crate) const AR_DIMER_ENERGY: f64 = 14.71;

/// Two- and three-body loss of the metastable 4s levels in pure argon.
/// Rate constants from Kolts and Setser, J. Chem. Phys. 68 (1978), 4848.
pub(crate) struct MetastableArAr {
    pub token: &'static str,
    /// Three-body rate constant to the excimer [cm^6 ns^-1].
    pub k3: f64,
    /// Two-body rate constant to 1S4 [cm^3 ns^-1].
    pub k2: f64,
}

pub(crate) static AR_4S_AR: &[MetastableArAr] = &[
    MetastableArAr {
        token: "1S5",
        k3: 1.1e-41,
        k2: 2.1e-24,
    },
    MetastableArAr {
        token: "1S3",
        k3: 0.83e-41,
        k2: 5.3e-24,
    },
];

/// One collisional population transfer between 4p levels.
pub(crate) struct PairTransfer {
    pub dest: &'static str,
    /// Rate constant [cm^3 ns^-1].
    pub k: f64,
}

/// Collisional depopulation of a 4p level in collisions with ground
/// state argon. Intra-4p transfer rates from Nguyen and Sadeghi,
/// Phys. Rev. A 18 (1978), 1388; transfer to the 4s manifold (split
/// equally over the four levels) from Chang and Setser,
/// J. Chem. Phys. 69 (1978), 3885.
pub(crate) struct Ar4pArRule {
    pub token: &'static str,
    /// Total rate constant for transfer to the 4s levels [cm^3 ns^-1].
    pub k_4s: f64,
    pub transfers: &'static [PairTransfer],
}

const fn pt(dest: &'static str, k: f64) -> PairTransfer {
    PairTransfer { dest, k }
}

pub(crate) static AR_4P_AR: &[Ar4pArRule] = &[
    Ar4pArRule {
        token: "2P1",
        k_4s: 1.6e-20,
        transfers: &[],
    },
    Ar4pArRule {
        token: "2P2",
        k_4s: 5.3e-20,
        transfers: &[pt("2P3", 0.5e-21)],
    },
    Ar4pArRule {
        token: "2P3",
        k_4s: 4.7e-20,
        transfers: &[
            pt("2P4", 27.5e-21),
            pt("2P5", 0.3e-21),
            pt("2P6", 44.0e-21),
            pt("2P7", 1.4e-21),
            pt("2P8", 1.9e-21),
            pt("2P9", 0.8e-21),
        ],
    },
    Ar4pArRule {
        token: "2P4",
        k_4s: 3.9e-20,
        transfers: &[
            pt("2P3", 23.0e-21),
            pt("2P5", 0.7e-21),
            pt("2P6", 4.8e-21),
            pt("2P7", 3.2e-21),
            pt("2P8", 1.4e-21),
            pt("2P9", 3.3e-21),
        ],
    },
    Ar4pArRule {
        token: "2P5",
        k_4s: 0.0,
        transfers: &[
            pt("2P4", 1.7e-21),
            pt("2P6", 11.3e-21),
            pt("2P8", 9.5e-21),
        ],
    },
    Ar4pArRule {
        token: "2P6",
        k_4s: 0.0,
        transfers: &[pt("2P7", 4.1e-21), pt("2P8", 6.0e-21), pt("2P9", 1.0e-21)],
    },
    Ar4pArRule {
        token: "2P7",
        k_4s: 5.5e-20,
        transfers: &[
            pt("2P6", 2.5e-21),
            pt("2P8", 14.3e-21),
            pt("2P9", 23.3e-21),
        ],
    },
    Ar4pArRule {
        token: "2P8",
        k_4s: 3.0e-20,
        transfers: &[
            pt("2P6", 0.3e-21),
            pt("2P7", 0.8e-21),
            pt("2P9", 18.2e-21),
            pt("2P10", 1.0e-21),
        ],
    },
    Ar4pArRule {
        token: "2P9",
        k_4s: 3.5e-20,
        transfers: &[pt("2P8", 6.8e-21), pt("2P10", 5.1e-21)],
    },
    Ar4pArRule {
        token: "2P10",
        k_4s: 2.0e-20,
        transfers: &[],
    },
];

pub(crate) static AR_4S_TOKENS: &[&str] = &["1S5", "1S4", "1S3", "1S2"];

pub(crate) static AR_4P_TOKENS: &[&str] = &[
    "2P10", "2P9", "2P8", "2P7", "2P6", "2P5", "2P4", "2P3", "2P2", "2P1",
];

/// 3d and 5s levels, collisionally transferred to the 4p manifold.
pub(crate) static AR_3D5S_GROUP: &[&str] = &[
    "3D6", "3D5", "3D3", "3D4!", "3D4", "3D1!!", "3D1!", "3D2", "3S1!!!!", "3S1!!", "3S1!!!",
    "3S1!", "2S5", "2S4", "2S3", "2S2",
];

/// Levels above the 3d/5s group, collisionally transferred to 4p and
/// subject to Hornbeck-Molnar associative ionisation.
pub(crate) static AR_HIGH_GROUP: &[&str] = &[
    "4D5", "3S4", "4D2", "4S1!", "3S2", "5D5", "4S4", "5D2", "6D5", "5S1!", "4S2", "5S4", "6D2",
];

/// Non-resonant 3d levels quenched by hard-sphere collisions.
pub(crate) static AR_NONRES_3D: &[&str] = &[
    "3D6", "3D3", "3D4!", "3D4", "3D1!!", "3D1!", "3S1!!!!", "3S1!!", "3S1!!!",
];

/// Non-resonant 5s levels quenched by hard-sphere collisions.
pub(crate) static AR_NONRES_5S: &[&str] = &["2S5", "2S3"];

/// Hornbeck-Molnar rate constant [cm^3 ns^-1] for the levels above the
/// 3d/5s group. This value seems high, to be checked.
pub(crate) const K_HORNBECK_MOLNAR: f64 = 2.0e-18;

/// Effective radii for hard-sphere quenching [cm].
pub(crate) const R_AR_3D: f64 = 436.0e-10;
pub(crate) const R_AR_5S: f64 = 635.0e-10;

/// How a collisional quenching channel is split between Penning
/// ionisation and plain loss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PenningSplit {
    /// Single loss channel, no ionisation branch.
    Single,
    /// Ionisation probability from the photoionisation yield,
    /// eta^(2/5) (Watanabe-Katsuura).
    WkYield,
    Fixed(f64),
    /// Adjustable 4s branching ratio.
    EtaFit4s,
    /// Adjustable 4p branching ratio.
    EtaFit4p,
    /// Adjustable 4p branching ratio, applied only when the
    /// photoionisation yield is non-zero.
    EtaFit4pIfYield,
    /// Adjustable 3d/5s branching ratio.
    EtaFit3d,
}

/// Tabulated quenching rate constant for one argon level.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FixedQuench {
    pub token: &'static str,
    /// Rate constant [cm^3 ns^-1].
    pub k: f64,
    pub split: PenningSplit,
}

const fn fq(token: &'static str, k: f64, split: PenningSplit) -> FixedQuench {
    FixedQuench { token, k, split }
}

/// How the 4p rate constants of a quencher are obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum P4Mode {
    /// Use the tabulated constants directly.
    Table,
    /// Scale the ethane constants by collision radius and reduced mass.
    EthaneScaled,
}

/// Quenching data for one admixture gas. The tabulated 4s rate
/// constants are from Velazco et al., J. Chem. Phys. 69 (1978), the 4p
/// constants from Sadeghi et al., J. Chem. Phys. 115 (2001).
pub(crate) struct QuencherSpec {
    pub gas: &'static str,
    /// Hard-sphere radius of the quencher against the 3d levels [cm].
    pub radius_3d: f64,
    /// Hard-sphere radius of the quencher against the 5s levels [cm].
    pub radius_5s: f64,
    /// Tabulated 4s and explicit 4p rate constants.
    pub fixed: &'static [FixedQuench],
    /// Rate constant for the remaining 4p levels (average).
    pub p4_rest: FixedQuench,
    pub p4_mode: P4Mode,
    /// Splitting of the Watanabe-Katsuura channels (resonant levels).
    pub wk_split: PenningSplit,
    /// Whether the hard-sphere rate carries an adjustable prefactor.
    pub hs_fitted: bool,
    /// Splitting of the hard-sphere channels (non-resonant 3d/5s).
    pub hs_split: PenningSplit,
}

use PenningSplit::{EtaFit3d, EtaFit4p, EtaFit4pIfYield, EtaFit4s, Fixed, Single, WkYield};

pub(crate) static QUENCHERS: &[QuencherSpec] = &[
    QuencherSpec {
        gas: "CO2",
        radius_3d: 165.0e-10,
        radius_5s: 165.0e-10,
        fixed: &[
            fq("1S5", 5.3e-19, Single),
            fq("1S4", 5.0e-19, Single),
            fq("1S3", 5.9e-19, Single),
            fq("1S2", 7.4e-19, Single),
            fq("2P8", 6.4e-19, Single),
            fq("2P6", 6.1e-19, Single),
            fq("2P5", 6.6e-19, Single),
            fq("2P1", 6.2e-19, Single),
        ],
        p4_rest: fq("", 6.33e-19, Single),
        p4_mode: P4Mode::Table,
        wk_split: WkYield,
        hs_fitted: true,
        hs_split: EtaFit3d,
    },
    QuencherSpec {
        gas: "CH4",
        radius_3d: 190.0e-10,
        radius_5s: 190.0e-10,
        fixed: &[
            fq("1S5", 4.55e-19, Single),
            fq("1S4", 4.5e-19, Single),
            fq("1S3", 5.30e-19, Single),
            fq("1S2", 5.7e-19, Single),
            fq("2P8", 7.4e-19, EtaFit4pIfYield),
            fq("2P6", 3.4e-19, EtaFit4pIfYield),
            fq("2P5", 6.0e-19, EtaFit4pIfYield),
            fq("2P1", 9.3e-19, EtaFit4pIfYield),
        ],
        p4_rest: fq("", 6.53e-19, EtaFit4pIfYield),
        p4_mode: P4Mode::Table,
        wk_split: WkYield,
        hs_fitted: true,
        hs_split: EtaFit3d,
    },
    QuencherSpec {
        gas: "C2H6",
        radius_3d: 195.0e-10,
        radius_5s: 195.0e-10,
        fixed: &[
            fq("1S5", 5.29e-19, WkYield),
            fq("1S4", 6.2e-19, WkYield),
            fq("1S3", 6.53e-19, EtaFit4s),
            fq("1S2", 10.7e-19, WkYield),
            fq("2P8", 9.2e-19, EtaFit4p),
            fq("2P6", 4.8e-19, EtaFit4p),
            fq("2P5", 9.9e-19, EtaFit4p),
            fq("2P1", 11.0e-19, EtaFit4p),
        ],
        p4_rest: fq("", 8.7e-19, EtaFit4p),
        p4_mode: P4Mode::Table,
        wk_split: WkYield,
        hs_fitted: true,
        hs_split: EtaFit3d,
    },
    QuencherSpec {
        gas: "iC4H10",
        radius_3d: 250.0e-10,
        radius_5s: 250.0e-10,
        fixed: &[
            fq("1S5", 7.1e-19, WkYield),
            fq("1S4", 6.1e-19, WkYield),
            fq("1S3", 8.5e-19, WkYield),
            fq("1S2", 11.0e-19, WkYield),
            // Ethane rate constants, scaled at build time.
            fq("2P8", 9.2e-19, WkYield),
            fq("2P6", 4.8e-19, WkYield),
            fq("2P5", 9.9e-19, WkYield),
            fq("2P1", 11.0e-19, WkYield),
        ],
        p4_rest: fq("", 5.5e-19, WkYield),
        p4_mode: P4Mode::EthaneScaled,
        wk_split: WkYield,
        hs_fitted: false,
        hs_split: WkYield,
    },
    QuencherSpec {
        gas: "C2H2",
        radius_3d: 165.0e-10,
        radius_5s: 165.0e-10,
        fixed: &[
            fq("1S5", 5.6e-19, Fixed(0.61)),
            fq("1S4", 4.6e-19, WkYield),
            fq("1S3", 5.6e-19, Fixed(0.61)),
            fq("1S2", 8.7e-19, WkYield),
            fq("2P8", 5.0e-19, Fixed(0.3)),
            fq("2P6", 5.7e-19, Fixed(0.3)),
            fq("2P5", 6.0e-19, Fixed(0.3)),
            fq("2P1", 5.3e-19, Fixed(0.3)),
        ],
        p4_rest: fq("", 5.5e-19, Fixed(0.3)),
        p4_mode: P4Mode::Table,
        wk_split: WkYield,
        hs_fitted: false,
        hs_split: WkYield,
    },
    QuencherSpec {
        gas: "CF4",
        radius_3d: 235.0e-10,
        radius_5s: 190.0e-10,
        fixed: &[
            fq("1S5", 0.33e-19, Single),
            fq("1S3", 0.26e-19, Single),
            fq("2P8", 1.7e-19, Single),
            fq("2P6", 1.7e-19, Single),
            fq("2P5", 1.6e-19, Single),
            fq("2P1", 2.2e-19, Single),
        ],
        p4_rest: fq("", 1.8e-19, Single),
        p4_mode: P4Mode::Table,
        wk_split: Single,
        hs_fitted: false,
        hs_split: Single,
    },
];

/// Constants for scaling the ethane 4p rate constants to isobutane.
pub(crate) const R_AR_4P: f64 = 340.0e-10;
pub(crate) const R_ETHANE: f64 = 195.0e-10;
pub(crate) const R_ISOBUTANE: f64 = 250.0e-10;
pub(crate) const M_ARGON_AMU: f64 = 39.9;
pub(crate) const M_ETHANE_AMU: f64 = 30.1;
pub(crate) const M_ISOBUTANE_AMU: f64 = 58.1;

/// Neon excitation tokens recognized by the level mapping. Channel data
/// for these levels is not tabulated yet; a mixture containing neon
/// excitations therefore falls back to Penning-only handling.
pub(crate) static NE_TOKENS: &[&str] = &[
    "1S5", "1S4", "1S3", "1S2", "2P10", "2P9", "2P8", "2P7", "2P6", "2P5", "2P4", "2P3", "2P2",
    "2P1", "2S5", "2S4", "2S3", "2S2", "3D6", "3D5", "3D4!", "3D4", "3D3", "3D2", "3D1!!",
    "3D1!", "3S1!!!!", "3S1!!!", "3S1!!", "3S1!", "3P10_3P6", "3P5_3P2", "3P1", "3S4", "3S2",
    "4D5", "4D2", "4S1!", "4S4", "5D5", "5D2", "4S2", "5S1!", "SUM_S_HIGH", "SUM_D_HIGH",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_destination_token_exists() {
        for level in AR_LEVELS {
            for ch in level.channels {
                if let Target::Level(dest) = ch.dest {
                    assert!(
                        ar_level_data(dest).is_some(),
                        "{} -> {} references an unknown level",
                        level.token,
                        dest
                    );
                }
            }
        }
    }

    #[test]
    fn test_metastables_have_no_radiative_channels() {
        for token in ["1S5", "1S3"] {
            let data = ar_level_data(token).unwrap();
            assert!(data.channels.is_empty());
            assert_eq!(data.osc, 0.0);
        }
    }

    #[test]
    fn test_resonant_levels_decay_to_ground() {
        // Every level with a non-zero oscillator strength must have a
        // ground-state channel.
        for level in AR_LEVELS {
            if level.osc > 0.0 {
                assert!(
                    level
                        .channels
                        .iter()
                        .any(|c| matches!(c.dest, Target::Ground)),
                    "{} has osc > 0 but no ground-state channel",
                    level.token
                );
            }
        }
    }

    #[test]
    fn test_transfer_rules_reference_known_levels() {
        for rule in AR_4P_AR {
            assert!(ar_level_data(rule.token).is_some());
            for t in rule.transfers {
                assert!(ar_level_data(t.dest).is_some());
            }
        }
        for group in [AR_3D5S_GROUP, AR_HIGH_GROUP, AR_NONRES_3D, AR_NONRES_5S] {
            for token in group {
                assert!(ar_level_data(token).is_some(), "unknown token {}", token);
            }
        }
    }

    #[test]
    fn test_quencher_tokens_exist() {
        for q in QUENCHERS {
            for f in q.fixed {
                assert!(ar_level_data(f.token).is_some());
            }
        }
    }
}
