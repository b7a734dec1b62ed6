//! Paths of the shop backend, relative to `API_BASE_URL`.

pub const PATH_BIRDS: &str = "birds";
pub const PATH_ELIGIBLE_MATES: &str = "birds/eligible-mates";
pub const PATH_PAIRINGS: &str = "breeding/pairings";
pub const PATH_START_INCUBATION: &str = "breeding/incubations/start";
pub const PATH_INCUBATIONS: &str = "incubations";
pub const PATH_SHARE_LINKS: &str = "share-links";
pub const PATH_SALES_STATS: &str = "stats/sales";

pub fn bird(bird_id: i64) -> String {
    format!("{PATH_BIRDS}/{bird_id}")
}

pub fn bird_status(bird_id: i64) -> String {
    format!("{PATH_BIRDS}/{bird_id}/status")
}

pub fn bird_mate(bird_id: i64) -> String {
    format!("{PATH_BIRDS}/{bird_id}/mate")
}

pub fn bird_photos(bird_id: i64) -> String {
    format!("{PATH_BIRDS}/{bird_id}/photos")
}

pub fn bird_photo(bird_id: i64, photo_id: i64) -> String {
    format!("{PATH_BIRDS}/{bird_id}/photos/{photo_id}")
}

pub fn bird_share_links(bird_id: i64) -> String {
    format!("{PATH_BIRDS}/{bird_id}/share-links")
}

pub fn bird_share_links_regenerate(bird_id: i64) -> String {
    format!("{PATH_BIRDS}/{bird_id}/share-links/regenerate")
}

pub fn share_link(link_id: i64) -> String {
    format!("{PATH_SHARE_LINKS}/{link_id}")
}

pub fn bird_sale(bird_id: i64) -> String {
    format!("{PATH_BIRDS}/{bird_id}/sale")
}

pub fn bird_return(bird_id: i64) -> String {
    format!("{PATH_BIRDS}/{bird_id}/return")
}

pub fn bird_follow_ups(bird_id: i64) -> String {
    format!("{PATH_BIRDS}/{bird_id}/follow-ups")
}

pub fn incubation(incubation_id: i64) -> String {
    format!("{PATH_INCUBATIONS}/{incubation_id}")
}

pub fn incubation_complete(incubation_id: i64) -> String {
    format!("{PATH_INCUBATIONS}/{incubation_id}/complete")
}
