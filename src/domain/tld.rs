//! TLD knowledge used by the domain validator.
//!
//! Heuristic allow-lists, not authoritative DNS data. Unlisted new TLDs are
//! handled by the validator's lowercase-letter fallback.

/// Two-label public suffixes checked before the single-label table.
pub(crate) const MULTI_PART_TLDS: &[&str] = &[
    "co.uk", "org.uk", "me.uk", "ac.uk", "gov.uk", "ltd.uk", "plc.uk", "net.uk", "com.au",
    "net.au", "org.au", "edu.au", "gov.au", "co.nz", "net.nz", "org.nz", "co.jp", "ne.jp",
    "or.jp", "ac.jp", "co.in", "net.in", "org.in", "gen.in", "firm.in", "com.br", "net.br",
    "org.br", "com.mx", "org.mx", "com.ar", "com.cn", "net.cn", "org.cn", "com.hk", "com.tw",
    "com.sg", "com.my", "co.kr", "or.kr", "co.za", "org.za", "web.za", "com.tr", "org.tr",
    "co.il", "org.il", "com.co", "com.pe", "com.ph", "com.vn", "co.th", "co.id", "com.sa",
    "com.eg", "com.ng", "co.ke", "com.pk", "com.bd", "com.ua", "com.pl", "com.ru", "com.gr",
    "com.pt", "com.es",
];

/// Known single-label TLDs, generic and country-code alike.
pub(crate) const KNOWN_TLDS: &[&str] = &[
    // original gTLDs + common infrastructure
    "com", "net", "org", "edu", "gov", "mil", "int", "info", "biz", "name", "pro", "mobi",
    "aero", "asia", "jobs", "tel", "travel", "xxx", "arpa",
    // popular new gTLDs
    "io", "ai", "co", "app", "dev", "tech", "online", "site", "store", "shop", "blog", "cloud",
    "digital", "agency", "studio", "design", "media", "news", "live", "today", "world", "email",
    "group", "expert", "solutions", "services", "company", "ventures", "capital", "finance",
    "fund", "global", "health", "care", "legal", "consulting", "software", "systems", "network",
    "tools", "plus", "club", "team", "works", "space", "website", "xyz", "me", "tv", "cc", "fm",
    "am", "ly", "to", "gg", "sh", "vc", "ws", "nu", "la", "one", "run", "top", "win", "work",
    "zone", "life", "link", "page", "pink", "red", "blue", "wiki", "chat", "city", "codes",
    "coffee", "cool", "earth", "energy", "events", "exchange", "farm", "fit", "guru", "house",
    "institute", "international", "land", "marketing", "partners", "photography", "pizza",
    "press", "pub", "rocks", "sale", "school", "social", "support", "training", "video", "vip",
    // country codes frequently seen on business sites
    "us", "uk", "de", "fr", "es", "it", "nl", "be", "ch", "at", "dk", "se", "no", "fi", "pl",
    "cz", "sk", "hu", "ro", "bg", "gr", "pt", "ie", "is", "lu", "li", "mt", "cy", "ee", "lv",
    "lt", "ua", "by", "ru", "tr", "il", "sa", "ae", "qa", "kw", "in", "pk", "bd", "lk", "np",
    "cn", "jp", "kr", "tw", "hk", "sg", "my", "th", "vn", "ph", "id", "au", "nz", "ca", "mx",
    "br", "ar", "cl", "pe", "uy", "py", "bo", "ec", "ve", "za", "ng", "ke", "eg", "ma", "gh",
];

pub(crate) fn is_known_tld(label: &str) -> bool {
    KNOWN_TLDS.contains(&label)
}

pub(crate) fn is_multi_part_tld(suffix: &str) -> bool {
    MULTI_PART_TLDS.contains(&suffix)
}
