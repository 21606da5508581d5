//! The table behind [`Name`].
//!
//! Text is spread over [`Name::NUM_SHARDS`] independently locked shards, so
//! threads interning unrelated names rarely wait on each other. Interned
//! text is leaked and handed out as `&'static str`.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Name;

#[derive(Default)]
struct Shard {
    ids: FxHashMap<&'static str, u32>,
    texts: Vec<&'static str>,
}

pub(crate) struct Interner {
    shards: [RwLock<Shard>; Name::NUM_SHARDS],
}

impl Interner {
    /// An interner where the empty string is [`Name::EMPTY`].
    pub(crate) fn new() -> Self {
        let interner = Interner {
            shards: std::array::from_fn(|_| RwLock::new(Shard::default())),
        };
        {
            let mut first = interner.shards[0].write();
            first.ids.insert("", 0);
            first.texts.push("");
        }
        interner
    }

    /// The empty string always lands in shard 0.
    fn shard_of(text: &str) -> u32 {
        let hash = text
            .bytes()
            .take(8)
            .fold(0u32, |hash, byte| hash.wrapping_mul(31).wrapping_add(u32::from(byte)));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "NUM_SHARDS fits in u32"
        )]
        let shards = Name::NUM_SHARDS as u32;
        hash % shards
    }

    /// # Panics
    /// Panics if a shard holds more than [`Name::MAX_LOCAL`] strings.
    pub(crate) fn intern(&self, text: &str) -> Name {
        let index = Self::shard_of(text);
        let shard = &self.shards[index as usize];

        if let Some(&local) = shard.read().ids.get(text) {
            return Name::new(index, local);
        }

        let mut shard = shard.write();
        if let Some(&local) = shard.ids.get(text) {
            return Name::new(index, local);
        }
        let local = u32::try_from(shard.texts.len())
            .ok()
            .filter(|local| *local <= Name::MAX_LOCAL)
            .unwrap_or_else(|| panic!("name shard {index} is full"));
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        shard.texts.push(leaked);
        shard.ids.insert(leaked, local);
        Name::new(index, local)
    }

    pub(crate) fn lookup(&self, name: Name) -> &'static str {
        self.shards[name.shard()]
            .read()
            .texts
            .get(name.local())
            .copied()
            .unwrap_or("")
    }
}
