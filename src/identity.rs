//! Player gamertag generation
//!
//! Baseball-themed names like `ClutchHomer42`, generated once and kept in
//! storage so the player keeps the same name across rounds and visits.

use rand::Rng;

use crate::persistence::{IDENTITY_KEY, KeyValueStore};

const ADJECTIVES: [&str; 16] = [
    "Slugging", "Speedy", "Mighty", "Golden", "Iron", "Flying", "Swift", "Crafty", "Clutch",
    "Smooth", "Diamond", "Grand", "Wild", "Epic", "Power", "Royal",
];

const NOUNS: [&str; 16] = [
    "Bat", "Glove", "Arm", "Eye", "Cleats", "Slider", "Fastball", "Homer", "Catch", "Steal",
    "Ace", "MVP", "Captain", "Champ", "Legend", "Star",
];

/// Compose a fresh gamertag: adjective + noun + number in `0..100`
pub fn generate_gamertag<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    let number: u8 = rng.random_range(0..100);
    format!("{}{}{}", adjective, noun, number)
}

/// Return the stored gamertag, or generate and store a new one
///
/// Storage failures never fail the caller: the player just gets a name that
/// lasts for this session.
pub fn get_or_create_identity<S, R>(store: &S, rng: &mut R) -> String
where
    S: KeyValueStore + ?Sized,
    R: Rng + ?Sized,
{
    match store.get(IDENTITY_KEY) {
        Ok(Some(name)) if !name.is_empty() => return name,
        Ok(_) => {}
        Err(e) => log::warn!("Could not read gamertag: {}", e),
    }

    let name = generate_gamertag(rng);
    match store.set(IDENTITY_KEY, &name) {
        Ok(()) => log::info!("New gamertag: {}", name),
        Err(e) => log::warn!("Gamertag {} not saved, using it for this session only: {}", name, e),
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn split_gamertag(tag: &str) -> Option<(&str, &str, u32)> {
        let adjective = ADJECTIVES.iter().copied().find(|a| tag.starts_with(a))?;
        let rest = &tag[adjective.len()..];
        let noun = NOUNS.iter().copied().find(|n| rest.starts_with(n))?;
        let number = rest[noun.len()..].parse().ok()?;
        Some((adjective, noun, number))
    }

    #[test]
    fn test_generated_gamertag_shape() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            let tag = generate_gamertag(&mut rng);
            let (_, _, number) = split_gamertag(&tag).expect("unexpected gamertag shape");
            assert!(number < 100);
        }
    }

    #[test]
    fn test_word_lists_give_25600_combinations() {
        assert_eq!(ADJECTIVES.len() * NOUNS.len() * 100, 25_600);
    }

    #[test]
    fn test_identity_is_stable() {
        let store = MemoryStore::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let first = get_or_create_identity(&store, &mut rng);
        let second = get_or_create_identity(&store, &mut rng);
        assert_eq!(first, second);
        assert_eq!(store.get(IDENTITY_KEY).unwrap(), Some(first));
    }

    #[test]
    fn test_existing_identity_returned_unchanged() {
        let store = MemoryStore::new();
        store.set(IDENTITY_KEY, "CustomName").unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(get_or_create_identity(&store, &mut rng), "CustomName");
    }

    #[test]
    fn test_reads_gamertag_saved_by_browser_build() {
        let store = MemoryStore::new();
        store.set("baseballGamertag", "MightyBatter7").unwrap();
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(get_or_create_identity(&store, &mut rng), "MightyBatter7");
    }

    #[test]
    fn test_storage_failure_falls_back_to_session_name() {
        let store = MemoryStore::new();
        store.fail_reads(true);
        store.fail_writes(true);
        let mut rng = Pcg32::seed_from_u64(3);
        let name = get_or_create_identity(&store, &mut rng);
        assert!(split_gamertag(&name).is_some());

        store.fail_reads(false);
        assert_eq!(store.get(IDENTITY_KEY).unwrap(), None);
    }
}
