//! Memoray Match entry point
//!
//! The browser build is driven from JavaScript through `MemoryGame`. Natively
//! this runs a headless demo: a bot with perfect recall plays a few rounds on
//! the virtual clock and prints the leaderboard.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::collections::HashMap;

    use memoray_match::highscores::format_time;
    use memoray_match::sim::{Catalog, ContentKey, Engine, GameClock, GamePhase};
    use memoray_match::{BoardSize, KeyValueStore, MemoryStore, Settings};

    /// Time the bot "thinks" between clicks
    const THINK_MS: u64 = 700;
    const ROUNDS: u32 = 3;

    /// Remembers every face it has seen, like a player with perfect recall
    #[derive(Default)]
    struct Bot {
        seen: HashMap<usize, ContentKey>,
    }

    impl Bot {
        fn forget(&mut self) {
            self.seen.clear();
        }

        fn look<S: KeyValueStore>(&mut self, engine: &Engine<S>) {
            for card in engine.cards().iter().filter(|c| c.revealed) {
                if card.matched {
                    self.seen.remove(&card.id);
                } else {
                    self.seen.insert(card.id, card.content_key);
                }
            }
        }

        fn known_pair(&self) -> Option<(usize, usize)> {
            self.seen.iter().find_map(|(&a, key)| {
                self.seen
                    .iter()
                    .find(|&(&b, other)| b != a && other == key)
                    .map(|(&b, _)| (a, b))
            })
        }

        fn partner_of(&self, id: usize, key: ContentKey) -> Option<usize> {
            self.seen
                .iter()
                .find(|&(&other, k)| other != id && *k == key)
                .map(|(&other, _)| other)
        }

        fn unseen<S: KeyValueStore>(&self, engine: &Engine<S>, except: Option<usize>) -> Option<usize> {
            engine
                .cards()
                .iter()
                .find(|c| !c.matched && !self.seen.contains_key(&c.id) && Some(c.id) != except)
                .map(|c| c.id)
        }

        /// Pick the next two cards to flip
        fn choose<S: KeyValueStore>(&mut self, engine: &Engine<S>) -> Option<(usize, usize)> {
            if let Some(pair) = self.known_pair() {
                return Some(pair);
            }
            let first = self.unseen(engine, None)?;
            Some((first, self.unseen(engine, Some(first)).unwrap_or(first)))
        }
    }

    fn click<S: KeyValueStore>(engine: &mut Engine<S>, clock: &mut GameClock, bot: &mut Bot, id: usize) {
        clock.advance(engine, THINK_MS);
        let outcome = engine.reveal_card(id);
        clock.arm(&outcome);
        bot.look(engine);
    }

    fn play_round<S: KeyValueStore>(engine: &mut Engine<S>, clock: &mut GameClock, bot: &mut Bot) {
        bot.forget();
        while engine.phase() == GamePhase::Running {
            let Some((first, planned)) = bot.choose(engine) else {
                log::warn!("Bot ran out of cards to try");
                return;
            };
            click(engine, clock, bot, first);

            // The first flip may have uncovered a face we already know
            let key = engine.cards()[first].content_key;
            let second = bot.partner_of(first, key).unwrap_or(planned);
            click(engine, clock, bot, second);

            // Wait out the flip-back so the next click isn't ignored
            while engine.pending_flip_back().is_some() {
                clock.advance(engine, 100);
            }
        }
    }

    fn parse_args() -> Settings {
        let mut settings = Settings::default();
        for arg in std::env::args().skip(1) {
            if let Some(preset) = BoardSize::from_str(&arg) {
                settings.pair_count = preset.pair_count();
            } else if let Ok(seed) = arg.parse() {
                settings.seed = Some(seed);
            } else {
                log::warn!("Ignoring argument `{}` (expected a board size or seed)", arg);
            }
        }
        settings
    }

    pub fn run() {
        memoray_match::platform::init_logging();
        log::info!("Memoray Match (native) starting...");

        let settings = parse_args();
        let mut clock = GameClock::new(settings.tick_interval_ms);
        let mut engine = match Engine::new(settings, Catalog::baseball(), MemoryStore::new()) {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                std::process::exit(1);
            }
        };
        engine.grant_consent();

        let mut bot = Bot::default();
        for round in 1..=ROUNDS {
            play_round(&mut engine, &mut clock, &mut bot);
            if let Some(result) = engine.last_result() {
                println!(
                    "Round {}: {} in {} with {} moves",
                    round,
                    result.player_name,
                    format_time(result.elapsed_seconds),
                    result.move_count
                );
            }
            if let Some(handle) = engine.reset_round() {
                clock.cancel(handle);
            }
        }

        println!("\nLeaderboard");
        for (i, entry) in engine.top_scores().entries.iter().enumerate() {
            println!(
                "{}. {:<20} {:>6} {:>4} moves",
                i + 1,
                entry.player_name,
                entry.formatted_time,
                entry.move_count
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is MemoryGame, this is just to satisfy the compiler
}
