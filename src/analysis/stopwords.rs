//! English stop-word list
//!
//! Built once per run and shared by reference with the tokenizer and the
//! scoring engine. The pronoun "I" is deliberately absent so it survives
//! tokenization as the keyword `I`.

use std::collections::HashSet;

const BASE_STOP_WORDS: &str = "
a about above across actually after again against all almost along alongside already also
although always am among amongst an and any anybody anyone anything anyway anywhere are
around as at away
back be became because become becomes becoming been before beforehand behind being below
beside besides between beyond both but by
can can't cannot could couldn't
did didn't do does doesn't doing don't done down during
each eg either else etc even ever every everybody everyone everything everywhere except
few first for former formerly from further
get gets getting given gives go goes going gone got
had hadn't has hasn't have haven't having he he'd he'll he's hence her here here's hers
herself him himself his how how's however
I I'd I'll I'm I've ie if in indeed instead into is isn't it it's its itself
just
last latter latterly least less let's
made make makes many may maybe me meanwhile might mine more moreover most mostly much must
mustn't my myself
namely near need neither nevertheless next no nobody none noone nor not nothing now
nowhere
of off often oh ok on once only onto or other others otherwise ought our ours ourselves
out over own
per perhaps please
quite
rather really
said same say says seem seemed seeming seems several shall shan't she she'd she'll she's
should shouldn't since so some somebody someone something sometime sometimes somewhere
still such
than that that's the their theirs them themselves then thence there there's thereafter
thereby therefore therein thereupon these they they'd they'll they're they've this those
though through thus to together too toward towards
under unless until up upon us
very via
was wasn't we we'd we'll we're we've well were weren't what what's whatever when when's
whence whenever where where's whereafter whereas whereby wherein whereupon wherever
whether which while whither who who's whoever whole whom whose why why's will with within
won't would wouldn't
yes yet you you'd you'll you're you've your yours yourself yourselves
";

const SUPPLEMENTARY_STOP_WORDS: &[&str] = &[
    "another", "also", "be", "is", "was", "were", "do", "does", "did", "s", "t", "u", "v", "w",
    "x", "y", "z",
];

/// A lower-case stop-word set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The built-in English list plus its supplementary entries
    pub fn english() -> Self {
        let mut words: HashSet<String> = BASE_STOP_WORDS
            .split_whitespace()
            .chain(SUPPLEMENTARY_STOP_WORDS.iter().copied())
            .map(str::to_lowercase)
            .collect();
        words.remove("i");
        Self { words }
    }

    /// The English list extended with `extra` (e.g. from configuration)
    pub fn english_with<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stop_words = Self::english();
        stop_words.words.extend(
            extra
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty() && w != "i"),
        );
        stop_words
    }

    /// Case-sensitive lookup; callers lower-case first
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}
