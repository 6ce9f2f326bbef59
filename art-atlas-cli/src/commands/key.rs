use art_atlas_core::CacheKey;

pub(crate) fn run_key(artist: &str, title: &str) {
    log::info!("{}", CacheKey::derive(artist, title));
}
