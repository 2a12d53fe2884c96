use romfetch_core::Platform;

/// ScreenScraper system id for arcade boards.
pub const ARCADE_SYSTEM_ID: u32 = 75;
/// ScreenScraper system id for Neo Geo MVS/AES.
pub const NEOGEO_SYSTEM_ID: u32 = 142;

/// Map a `Platform` to its ScreenScraper system id.
pub fn system_id(platform: Platform) -> u32 {
    match platform {
        Platform::Nes => 3,
        Platform::Snes => 4,
        Platform::N64 => 14,
        Platform::GameBoy => 9,
        Platform::GameBoyColor => 10,
        Platform::Gba => 12,
        Platform::Ds => 15,
        Platform::GameCube => 13,
        Platform::Sg1000 => 109,
        Platform::MasterSystem => 2,
        Platform::Genesis => 1,
        Platform::SegaCd => 20,
        Platform::Sega32x => 19,
        Platform::Saturn => 22,
        Platform::Dreamcast => 23,
        Platform::GameGear => 21,
        Platform::Ps1 => 57,
        Platform::Ps2 => 58,
        Platform::Psp => 61,
        Platform::TurboGrafx16 => 31,
        Platform::Atari2600 => 26,
        Platform::Atari7800 => 41,
        Platform::Lynx => 28,
        Platform::NeoGeoPocket => 25,
        Platform::WonderSwan => 45,
        Platform::ColecoVision => 48,
        Platform::Msx => 113,
        Platform::Arcade => ARCADE_SYSTEM_ID,
        Platform::NeoGeo => NEOGEO_SYSTEM_ID,
    }
}

/// System ids tried, in order, for an arcade archive lookup.
pub fn arcade_system_ids(platform: Option<Platform>) -> [u32; 2] {
    match platform {
        Some(Platform::NeoGeo) => [NEOGEO_SYSTEM_ID, ARCADE_SYSTEM_ID],
        _ => [ARCADE_SYSTEM_ID, NEOGEO_SYSTEM_ID],
    }
}
