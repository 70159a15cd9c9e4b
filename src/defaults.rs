//! Default configuration constants for queryvoice.
//!
//! Shared by the configuration types and the components that fall back to
//! them when no configuration is supplied.

/// Language tag used for capture and narration.
pub const LANGUAGE: &str = "en-US";

/// Narration speaking rate (1.0 = platform normal).
///
/// Slightly slower than normal so clause references stay intelligible.
pub const SPEECH_RATE: f32 = 0.9;

/// Narration pitch (1.0 = platform normal).
pub const SPEECH_PITCH: f32 = 1.0;

/// Narration volume (0.0 to 1.0).
pub const SPEECH_VOLUME: f32 = 0.8;

/// Currency symbol prefixed to the amount in narration text.
pub const CURRENCY: &str = "₹";

/// Whether new results are narrated automatically.
pub const AUTO_ANNOUNCE: bool = true;

/// Valid range for the speaking rate.
pub const RATE_RANGE: (f32, f32) = (0.1, 10.0);

/// Valid range for the pitch.
pub const PITCH_RANGE: (f32, f32) = (0.0, 2.0);

/// Valid range for the volume.
pub const VOLUME_RANGE: (f32, f32) = (0.0, 1.0);

/// Error code reported when capture ends without any recognized speech.
pub const NO_SPEECH_CODE: &str = "no-speech";

/// Name fragments of synthesis voices commonly presented as feminine.
///
/// Matched as case-insensitive substrings of the voice display name.
pub const FEMININE_VOICE_NAMES: &[&str] = &[
    "samantha", "victoria", "alex", "karen", "helena", "maria", "sophie", "anna", "yuki",
    "xiaoxiao", "ayesha", "female", "woman", "girl", "lisa", "sarah", "emma", "olivia", "ava",
    "isabella", "sophia", "charlotte", "amelia", "harper", "evelyn", "abigail", "emily",
    "elizabeth", "sofia", "madison", "avery", "ella", "scarlett", "grace", "chloe", "camila",
    "penelope", "layla", "riley", "zoey", "nora", "lily", "eleanor", "hannah", "luna", "savannah",
    "brooklyn", "leah", "zoe", "stella", "hazel", "ellie", "paisley", "audrey", "skylar",
    "violet", "claire", "bella", "aurora", "lucy", "caroline",
];

/// Name fragments of synthesis voices commonly presented as masculine.
///
/// Used only to exclude voices in the last selection fallback.
pub const MASCULINE_VOICE_NAMES: &[&str] = &[
    "david", "james", "john", "michael", "robert", "william", "richard", "joseph", "thomas",
    "christopher", "charles", "daniel", "matthew", "anthony", "mark", "donald", "steven", "paul",
    "andrew", "joshua", "kenneth", "kevin", "brian", "george", "edward", "ronald", "timothy",
    "jason", "jeffrey", "ryan", "jacob", "gary", "nicholas", "eric", "jonathan", "stephen",
    "larry", "justin", "scott", "brandon", "benjamin", "samuel", "frank", "gregory", "raymond",
    "alexander", "patrick", "jack", "dennis", "jerry", "tyler", "aaron", "jose", "adam", "nathan",
    "henry", "douglas", "zachary", "peter", "kyle", "walter", "ethan", "jeremy", "harold", "seth",
    "christian", "mason", "austin", "juan", "keith", "roger", "noah", "carl", "alan", "cameron",
    "allan", "theodore", "sean", "gavin", "glen", "glenn", "mike", "jim", "jimmy", "bob", "rob",
    "tom", "tony", "dave", "dan", "chris", "nick", "sam", "ben", "joe", "jake", "matt", "andy",
    "josh", "nate", "steve", "brad", "bradley", "chad", "chadwick", "clint", "clinton", "drew",
    "ed", "eddie", "fred", "frederick", "freddie", "greg", "ian", "jeff", "ken", "kenny",
    "lawrence", "leo", "leonard", "leonardo", "marc", "marcus", "marty", "martin", "max",
    "maxwell", "maximilian", "mitch", "mitchell", "nathaniel", "nicky", "pat", "patty", "phil",
    "philip", "phillip", "randy", "randall", "randolph", "rick", "ricky", "robbie", "ron",
    "ronnie", "ross", "russ", "russell", "rusty", "sammie", "shawn", "shaun", "sid", "sidney",
    "sydney", "stan", "stanley", "stevie", "ted", "teddy", "tim", "timmy", "todd", "tommy",
    "troy", "ty", "vince", "vincent", "vinnie", "walt", "wally", "wayne", "wes", "wesley",
    "weston", "will", "willie", "willy", "zach", "zack", "zackary",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_narration_defaults_within_ranges() {
        assert!(SPEECH_RATE >= RATE_RANGE.0 && SPEECH_RATE <= RATE_RANGE.1);
        assert!(SPEECH_PITCH >= PITCH_RANGE.0 && SPEECH_PITCH <= PITCH_RANGE.1);
        assert!(SPEECH_VOLUME >= VOLUME_RANGE.0 && SPEECH_VOLUME <= VOLUME_RANGE.1);
    }

    #[test]
    fn test_name_lists_are_lowercase_and_unique() {
        for list in [FEMININE_VOICE_NAMES, MASCULINE_VOICE_NAMES] {
            let mut seen = HashSet::new();
            for name in list {
                assert_eq!(*name, name.to_lowercase(), "{name} should be lowercase");
                assert!(seen.insert(*name), "{name} listed twice");
            }
        }
    }
}
