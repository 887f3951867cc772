use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Cues that force the exploratory route: comparison, superlative and
    /// qualitative language never resolves to a single-attribute lookup.
    pub static ref EXPLORATORY_CUES: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(best|worst|better|worse|top|most|least|cheapest|closest|nearest|nicest|safest)\b").unwrap(),
        Regex::new(r"(?i)\b(why|how come|how good|how bad|how is|how are)\b").unwrap(),
        Regex::new(r"(?i)\b(compare|compared|versus|vs\.?|difference between|rather than)\b").unwrap(),
        Regex::new(r"(?i)\b(recommend|suggest|worth|good|bad|great|nice|quality|opinion|review|reviews|people say|think of)\b").unwrap(),
        Regex::new(r"(?i)\b(which|what kind of|any)\b.*\b(in|near|around|along|close to)\b").unwrap(),
    ];

    /// Single-entity single-attribute factual phrasing.
    pub static ref DIRECT_CUES: Vec<Regex> = vec![
        Regex::new(r"(?i)^\s*(what|where) is (the )?\w+ (of|for) ").unwrap(),
        Regex::new(r"(?i)\b(how many|how much|how long|population of|address of|rating of|length of|name of)\b").unwrap(),
        Regex::new(r"(?i)\b(does|is|are)\b.*\b(located|situated|open|closed)\b").unwrap(),
        Regex::new(r"(?i)\b(list|count) (all |the )?\w+").unwrap(),
    ];

    pub static ref OPINION_CUES: Regex = Regex::new(
        r"(?i)\b(good|bad|best|worst|great|nice|terrible|recommend|worth|quality|opinion|review|reviews|friendly|clean|safe|service|why|people say|think of)\b"
    ).unwrap();

    pub static ref PROXIMITY_CUES: Regex = Regex::new(
        r"(?i)\b(near|nearby|nearest|closest|close to|around|next to|distance|far|walk|walking|route|road|street|avenue|corner|intersection|between)\b"
    ).unwrap();

    pub static ref FACTUAL_CUES: Regex = Regex::new(
        r"(?i)\b(what is|where is|how many|how much|when|population|address|rating|length|area)\b"
    ).unwrap();

    /// Words that never identify an entity; dropped before mention matching.
    pub static ref STOPWORDS: Vec<&'static str> = vec![
        "a", "an", "the", "in", "on", "at", "of", "for", "to", "from", "with",
        "is", "are", "was", "were", "do", "does", "did", "have", "has", "had",
        "what", "which", "where", "when", "why", "how", "who", "any", "all",
        "and", "or", "not", "near", "nearby", "good", "best", "there", "that",
        "this", "those", "these", "it", "its", "me", "my", "i", "you",
    ];
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}
