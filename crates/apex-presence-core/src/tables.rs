//! Curated lookup tables: status/mode labels, map labels, map icons, and the
//! suffix-termination set used by the normalizer.
//!
//! The tables are append-only data. A newly released map or mode only needs
//! a row here. Map keys are canonical: lower-case, no leading `#`.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

// ─── Sentinel keys & defaults ─────────────────────────────────────

pub const MAIN_MENU_KEY: &str = "#MAINMENU";
pub const LOADING_SCREEN_KEY: &str = "#LOADINGSCREEN";
pub const FIRING_RANGE_ALONE_KEY: &str = "#PL_FIRINGRANGE-ALONE";
pub const FIRING_RANGE_PARTY_KEY: &str = "#PL_FIRINGRANGE-PARTY";

/// Shown when a status token is neither recognized nor curated.
pub const UNRECOGNIZED_STATUS_LABEL: &str = "UNKNOWN, CONTACT MAINTAINER";
pub const UNKNOWN_MODE_LABEL: &str = "Unknown Mode";
pub const UNKNOWN_MAP_LABEL: &str = "Unknown Map";

pub const DEFAULT_ICON: &str = "apex-legends";
pub const FIRING_RANGE_ICON: &str = "firing-range";

/// Steam does not expose real party capacity; trios is the common case.
pub const PARTY_MAX: u32 = 3;

// ─── Status & game mode labels ────────────────────────────────────

const STATUS_LABELS: &[(&str, &str)] = &[
    // Firing range (synthetic keys, split by party size)
    (FIRING_RANGE_ALONE_KEY, "Shooting Dummy in the Firing Range"),
    (FIRING_RANGE_PARTY_KEY, "Shooting Friends in the Firing Range"),
    // Lobby
    ("#RICHPRESENCE_PARTY_LOBBY_N_N", "Chilling in the Lobby..."),
    ("#RICHPRESENCE_PARTY_LOBBY", "Chilling in the Lobby..."),
    // Game modes
    ("#PL_TRIO", "TRIOS"),
    ("#PL_DUO", "DUOS"),
    ("#PL_Ranked_Leagues", "RANKED LEAGUES"),
    ("#PL_RANKED_LEAGUES", "RANKED LEAGUES"),
    ("#GAMEMODE_ARENAS", "ARENAS"),
    ("#GAMEMODE_ARENAS_RANKED", "RANKED ARENAS"),
    ("#GAME_MODE_CONTROL", "CONTROL"),
    ("#GAME_MODE_GUNGAME", "GUN GAME"),
    ("#TDM_NAME", "TEAM DEATHMATCH"),
    ("#PL_DUO_DATE", "DATE NIGHT"),
    // Menus
    ("#PL_TRAINING", "In the training"),
    (LOADING_SCREEN_KEY, "Loading into the battle"),
    (MAIN_MENU_KEY, "In the Main Menu"),
];

// ─── Map labels ───────────────────────────────────────────────────

const MAP_LABELS: &[(&str, &str)] = &[
    // Reused
    ("mp_rr_canyonlands_staging", "Firing Range"),
    // Event variants (kept decorated on purpose)
    ("mp_rr_canyonlands_mu1_night", "Shadow Royale"),
    ("mp_rr_canyonlands_mu1_night_desc", "Shadow Royale"),
    ("mp_rr_desertlands_holiday", "Winter Express"),
    ("mp_rr_desertlands_holiday_desc", "Winter Express"),
    ("mp_rr_olympus_mu1_night", "After Dark"),
    // Battle royale
    ("mp_rr_canyonlands", "Kings Canyon"),
    ("mp_rr_desertlands", "World Edge"),
    ("mp_rr_olympus", "Olympus"),
    ("mp_rr_tropic_island", "Storm Point"),
    ("mp_rr_divided_moon", "Broken Moon"),
    // Arenas
    ("mp_rr_arena_phase_runner", "Phase Runner"),
    ("mp_rr_party_crasher", "Party Crasher"),
    ("mp_rr_aqueduct", "Overflow"),
    ("mp_rr_arena_skygarden", "Encore"),
    ("mp_rr_arena_composite", "Drop-Off"),
    ("mp_rr_arena_habitat", "Habitat 4"),
    ("mp_rr_freedm_map_name_the_core", "The Core"),
    // Control
    ("control_map_name_barometer", "Barometer"),
    ("control_map_name_lab", "Hammond Labs"),
    ("control_map_name_caustic", "Caustic Treatment"),
    ("control_map_name_production", "Production Yard"),
    ("control_map_name_lava_siphon", "Lava Siphon"),
    // Team deathmatch / gun run
    ("freedm_map_name_skulltown", "Skull Town"),
    ("freedm_map_name_estates", "Estates"),
    ("freedm_map_name_dome", "Phase Runner"),
    ("freedm_map_name_wattson", "Wattson's Pylon"),
    ("freedm_map_name_amps", "ZEUS Station"),
    ("freedm_map_name_fragment", "Fragment"),
];

// ─── Map icons ────────────────────────────────────────────────────

const MAP_ICONS: &[(&str, &str)] = &[
    ("mp_rr_canyonlands_staging", FIRING_RANGE_ICON),
    ("mp_rr_canyonlands_mu1_night", "shadow-royale"),
    ("mp_rr_canyonlands_mu1_night_desc", "shadow-royale"),
    ("mp_rr_desertlands_holiday", "winter-express"),
    ("mp_rr_desertlands_holiday_desc", "winter-express"),
    ("mp_rr_canyonlands", "kings-canyon"),
    ("mp_rr_desertlands", "world-edge"),
    ("mp_rr_olympus", "olympus"),
    ("mp_rr_tropic_island", "stormpoint"),
    ("mp_rr_arena_phase_runner", "phase-runner"),
    ("mp_rr_party_crasher", "party-crasher"),
    ("mp_rr_aqueduct", "overflow"),
    ("mp_rr_arena_skygarden", "encore"),
    ("mp_rr_arena_composite", "drop-off"),
    ("mp_rr_arena_habitat", "habitat"),
];

// ─── Suffix termination ───────────────────────────────────────────

/// Segments that end a map's base name: season updates (`mu1`), event
/// themes (`night`, `holiday`), size markers (`64k`) and description keys.
const TERMINATION_TOKENS: &[&str] = &[
    "mu1",
    "mu2",
    "mu3",
    "mu4",
    "night",
    "holiday",
    "halloween",
    "winter",
    "anniversary",
    "event",
    "ltm",
    "desc",
    "64k",
];

static STATUS_LABEL_INDEX: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| STATUS_LABELS.iter().copied().collect());

static MAP_LABEL_INDEX: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| MAP_LABELS.iter().copied().collect());

static MAP_ICON_INDEX: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| MAP_ICONS.iter().copied().collect());

static TERMINATION_INDEX: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| TERMINATION_TOKENS.iter().copied().collect());

/// Curated label for a status or game-mode token. Exact match.
pub fn lookup_label(token: &str) -> Option<&'static str> {
    STATUS_LABEL_INDEX.get(token).copied()
}

/// Curated label for a canonical map identifier.
pub fn lookup_map_label(identifier: &str) -> Option<&'static str> {
    MAP_LABEL_INDEX.get(identifier).copied()
}

/// Icon key for a canonical map identifier.
pub fn lookup_icon(identifier: &str) -> Option<&'static str> {
    MAP_ICON_INDEX.get(identifier).copied()
}

pub fn is_termination_token(segment: &str) -> bool {
    TERMINATION_INDEX.contains(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_curated_status_resolves_to_its_label() {
        for (token, label) in STATUS_LABELS {
            assert_eq!(lookup_label(token), Some(*label), "token={token}");
        }
    }

    #[test]
    fn every_curated_map_resolves_to_its_label() {
        for (id, label) in MAP_LABELS {
            assert_eq!(lookup_map_label(id), Some(*label), "id={id}");
        }
    }

    #[test]
    fn absent_tokens_yield_none() {
        assert_eq!(lookup_label("#PL_SOMETHING_NEW"), None);
        assert_eq!(lookup_label(""), None);
        assert_eq!(lookup_map_label("mp_rr_unreleased"), None);
        assert_eq!(lookup_icon("mp_rr_divided_moon"), None);
    }

    #[test]
    fn status_lookup_is_exact() {
        assert_eq!(lookup_label("#PL_TRIO"), Some("TRIOS"));
        assert_eq!(lookup_label("#pl_trio"), None);
    }

    #[test]
    fn status_and_map_namespaces_are_separate() {
        assert_eq!(lookup_label("mp_rr_olympus"), None);
        assert_eq!(lookup_map_label(MAIN_MENU_KEY), None);
    }

    #[test]
    fn map_keys_are_canonical() {
        for (id, _) in MAP_LABELS.iter().chain(MAP_ICONS) {
            assert_eq!(*id, id.to_ascii_lowercase(), "map key must be lower-case");
            assert!(!id.starts_with('#'), "map key must not carry '#': {id}");
        }
    }

    #[test]
    fn every_icon_has_a_label() {
        for (id, _) in MAP_ICONS {
            assert!(lookup_map_label(id).is_some(), "icon without label: {id}");
        }
    }

    #[test]
    fn base_names_do_not_contain_termination_tokens() {
        for (id, _) in MAP_LABELS {
            let decorated = id.split('_').any(is_termination_token);
            let is_event_variant =
                id.contains("_night") || id.contains("_holiday") || id.ends_with("_desc");
            assert!(
                !decorated || is_event_variant,
                "undecorated map key contains a termination token: {id}"
            );
        }
    }
}
