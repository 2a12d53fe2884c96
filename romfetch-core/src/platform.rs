/// Platform identifiers accepted as the platform hint of a scrape request.
///
/// The hint is free-form text supplied by the host; this enum is the
/// resolved form. Unknown hints are not an error, they simply carry no
/// platform (see [`Platform::from_hint`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    // Nintendo
    Nes,
    Snes,
    N64,
    GameBoy,
    GameBoyColor,
    Gba,
    Ds,
    GameCube,

    // Sega
    Sg1000,
    MasterSystem,
    Genesis,
    SegaCd,
    Sega32x,
    Saturn,
    Dreamcast,
    GameGear,

    // Sony
    Ps1,
    Ps2,
    Psp,

    // Others
    TurboGrafx16,
    Atari2600,
    Atari7800,
    Lynx,
    NeoGeoPocket,
    WonderSwan,
    ColecoVision,
    Msx,

    // Arcade
    Arcade,
    NeoGeo,
}

const ALL_PLATFORMS: &[Platform] = &[
    Platform::Nes,
    Platform::Snes,
    Platform::N64,
    Platform::GameBoy,
    Platform::GameBoyColor,
    Platform::Gba,
    Platform::Ds,
    Platform::GameCube,
    Platform::Sg1000,
    Platform::MasterSystem,
    Platform::Genesis,
    Platform::SegaCd,
    Platform::Sega32x,
    Platform::Saturn,
    Platform::Dreamcast,
    Platform::GameGear,
    Platform::Ps1,
    Platform::Ps2,
    Platform::Psp,
    Platform::TurboGrafx16,
    Platform::Atari2600,
    Platform::Atari7800,
    Platform::Lynx,
    Platform::NeoGeoPocket,
    Platform::WonderSwan,
    Platform::ColecoVision,
    Platform::Msx,
    Platform::Arcade,
    Platform::NeoGeo,
];

impl Platform {
    /// Canonical short name, as used by frontends for system folders.
    pub fn short_name(&self) -> &'static str {
        self.aliases()[0]
    }

    /// Full display name for the platform.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Nes => "Nintendo Entertainment System",
            Self::Snes => "Super Nintendo Entertainment System",
            Self::N64 => "Nintendo 64",
            Self::GameBoy => "Game Boy",
            Self::GameBoyColor => "Game Boy Color",
            Self::Gba => "Game Boy Advance",
            Self::Ds => "Nintendo DS",
            Self::GameCube => "Nintendo GameCube",
            Self::Sg1000 => "Sega SG-1000",
            Self::MasterSystem => "Sega Master System",
            Self::Genesis => "Sega Genesis / Mega Drive",
            Self::SegaCd => "Sega CD / Mega CD",
            Self::Sega32x => "Sega 32X",
            Self::Saturn => "Sega Saturn",
            Self::Dreamcast => "Sega Dreamcast",
            Self::GameGear => "Sega Game Gear",
            Self::Ps1 => "Sony PlayStation",
            Self::Ps2 => "Sony PlayStation 2",
            Self::Psp => "Sony PlayStation Portable",
            Self::TurboGrafx16 => "NEC TurboGrafx-16 / PC Engine",
            Self::Atari2600 => "Atari 2600",
            Self::Atari7800 => "Atari 7800",
            Self::Lynx => "Atari Lynx",
            Self::NeoGeoPocket => "Neo Geo Pocket",
            Self::WonderSwan => "Bandai WonderSwan",
            Self::ColecoVision => "ColecoVision",
            Self::Msx => "MSX",
            Self::Arcade => "Arcade",
            Self::NeoGeo => "SNK Neo Geo",
        }
    }

    /// All accepted names for this platform, canonical short name first.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Nes => &["nes", "famicom", "fc"],
            Self::Snes => &["snes", "sfc", "super famicom", "super nintendo"],
            Self::N64 => &["n64", "nintendo 64", "nintendo64"],
            Self::GameBoy => &["gb", "gameboy", "game boy"],
            Self::GameBoyColor => &["gbc", "gameboy color", "game boy color"],
            Self::Gba => &["gba", "game boy advance", "gameboy advance"],
            Self::Ds => &["nds", "ds", "nintendo ds"],
            Self::GameCube => &["gc", "gamecube", "gcn", "ngc"],
            Self::Sg1000 => &["sg-1000", "sg1000", "sc3000"],
            Self::MasterSystem => &["mastersystem", "sms", "master system", "mark iii"],
            Self::Genesis => &["genesis", "megadrive", "mega drive", "md"],
            Self::SegaCd => &["segacd", "sega cd", "megacd", "mega cd"],
            Self::Sega32x => &["sega32x", "32x", "sega 32x"],
            Self::Saturn => &["saturn", "sega saturn"],
            Self::Dreamcast => &["dreamcast", "dc"],
            Self::GameGear => &["gamegear", "game gear", "gg"],
            Self::Ps1 => &["psx", "ps1", "playstation"],
            Self::Ps2 => &["ps2", "playstation2", "playstation 2"],
            Self::Psp => &["psp", "playstation portable"],
            Self::TurboGrafx16 => &["pcengine", "pce", "tg16", "turbografx16"],
            Self::Atari2600 => &["atari2600", "2600"],
            Self::Atari7800 => &["atari7800", "7800"],
            Self::Lynx => &["atarilynx", "lynx"],
            Self::NeoGeoPocket => &["ngp", "ngpc", "neo geo pocket"],
            Self::WonderSwan => &["wonderswan", "ws", "wsc", "wonderswancolor"],
            Self::ColecoVision => &["coleco", "colecovision"],
            Self::Msx => &["msx", "msx2"],
            Self::Arcade => &["arcade", "mame", "fba", "fbneo"],
            Self::NeoGeo => &["neogeo", "neo geo", "aes", "mvs"],
        }
    }

    /// Arcade-class platforms: archive-format ROM sets, arcade providers
    /// and the arcade artwork priority.
    pub fn is_arcade(&self) -> bool {
        matches!(self, Self::Arcade | Self::NeoGeo)
    }

    /// Resolve a free-form platform hint. Blank or unknown hints give `None`.
    pub fn from_hint(hint: &str) -> Option<Platform> {
        let hint = hint.trim();
        if hint.is_empty() {
            return None;
        }
        hint.parse().ok()
    }

    pub fn all() -> &'static [Platform] {
        ALL_PLATFORMS
    }
}

/// Whether a raw platform hint selects arcade context.
pub fn arcade_context(hint: &str) -> bool {
    Platform::from_hint(hint).is_some_and(|p| p.is_arcade())
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string cannot be parsed into a `Platform`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown platform: '{0}'")]
pub struct PlatformParseError(pub String);

impl std::str::FromStr for Platform {
    type Err = PlatformParseError;

    /// Case-insensitive match against every alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        ALL_PLATFORMS
            .iter()
            .copied()
            .find(|p| p.aliases().contains(&lower.as_str()))
            .ok_or_else(|| PlatformParseError(s.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/platform_tests.rs"]
mod tests;
