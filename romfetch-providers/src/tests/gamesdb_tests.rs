use super::*;

const BY_NAME: &str = r#"{
    "code": 200,
    "status": "Success",
    "data": {
        "count": 2,
        "games": [
            {"id": 200, "game_title": "Super Mario World 2", "players": 1},
            {"id": 136, "game_title": "Super Mario World", "release_date": "1991-08-01",
             "players": 2, "overview": "Mario and Luigi.", "genres": [1, 15]}
        ]
    },
    "include": {
        "boxart": {
            "base_url": {"original": "https://cdn.thegamesdb.net/images/original/"},
            "data": {
                "136": [
                    {"id": 1, "type": "boxart", "side": "back", "filename": "boxart/back/136-1.jpg"},
                    {"id": 2, "type": "boxart", "side": "front", "filename": "boxart/front/136-1.jpg"}
                ]
            }
        }
    },
    "remaining_monthly_allowance": 2981
}"#;

#[test]
fn clean_title_strips_tags() {
    assert_eq!(clean_title("Super Mario World (USA) [!]"), "Super Mario World");
    assert_eq!(clean_title("Sonic_the_Hedgehog (Rev 1)"), "Sonic the Hedgehog");
    assert_eq!(clean_title("Tetris"), "Tetris");
    assert_eq!(clean_title("(Unl) [b]"), "");
}

#[test]
fn exact_title_match_wins_over_first_result() {
    let response: GamesResponse = serde_json::from_str(BY_NAME).unwrap();
    let index = pick_game(&response.data.games, "super mario world").unwrap();
    assert_eq!(response.data.games[index].id, 136);
}

#[test]
fn falls_back_to_first_result() {
    let response: GamesResponse = serde_json::from_str(BY_NAME).unwrap();
    assert_eq!(pick_game(&response.data.games, "Yoshi's Island"), Some(0));
    assert_eq!(pick_game(&[], "anything"), None);
}

#[test]
fn front_boxart_url_is_built_from_base_url() {
    let response: GamesResponse = serde_json::from_str(BY_NAME).unwrap();
    assert_eq!(
        front_boxart(response.include.as_ref(), 136).as_deref(),
        Some("https://cdn.thegamesdb.net/images/original/boxart/front/136-1.jpg")
    );
    assert_eq!(front_boxart(response.include.as_ref(), 200), None);
    assert_eq!(front_boxart(None, 136), None);
}

#[test]
fn empty_games_list_parses() {
    let response: GamesResponse =
        serde_json::from_str(r#"{"data": {"count": 0, "games": []}}"#).unwrap();
    assert!(response.data.games.is_empty());
    assert!(response.include.is_none());
}

#[test]
fn platform_ids_are_distinct() {
    let mut ids: Vec<u32> = Platform::all().iter().map(|p| platform_id(*p)).collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total);
}
