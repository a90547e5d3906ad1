// Attributes
pub const NUM_ATTRIBUTES: usize = 7;
pub const STANDARD_ATTRIBUTE_MIN: i32 = 0;
pub const STANDARD_ATTRIBUTE_MAX: i32 = 20;
pub const STANDARD_ATTRIBUTE_BASELINE: i32 = 6;
pub const LUCK_MIN: i32 = -6;
pub const LUCK_MAX: i32 = 14;
pub const LUCK_BASELINE: i32 = 0;

// Realm ladder
pub const NUM_MAJOR_REALMS: usize = 7;
pub const NUM_MINOR_REALMS: usize = 4;
pub const MAJOR_REALM_NAMES: [&str; NUM_MAJOR_REALMS] =
    ["炼气", "筑基", "金丹", "元婴", "化神", "合体", "大乘"];
pub const MINOR_REALM_NAMES: [&str; NUM_MINOR_REALMS] = ["初期", "中期", "后期", "巅峰"];

// Skills
pub const NUM_SKILL_RANKS: usize = 6;
pub const NUM_MASTERY_LEVELS: usize = 6;

// Character names
pub const MAX_NAME_CHARS: usize = 16;

// Persistence
pub const BUILD_SCHEMA_VERSION: u32 = 2;
pub const DATA_DIR_NAME: &str = ".xiuxian";
pub const PROGRESS_SAVE_MAGIC: u64 = 0x5849_5558_4941_4E02; // "XIUXIAN" v2
/// Talent tier assumed for stored builds that predate the field.
pub const DEFAULT_TALENT_TIER: &str = "fan_pin";
