//! Built-in trait and skill definitions.

use super::types::{AttributeThreshold, CatalogEntry, SkillRank};
use crate::character::AttributeType;
use crate::progression::MasteryLevel;

pub fn builtin_traits() -> Vec<CatalogEntry> {
    vec![
        // Boons
        CatalogEntry::new_trait("jian_xin", "剑心通明", "剑道感悟远超常人，修习剑诀事半功倍。", 6),
        CatalogEntry::new_trait("dan_dao", "丹道奇才", "对药性火候天生敏锐。", 5),
        CatalogEntry::new_trait("qi_hai", "气海宽广", "丹田容量远胜同辈。", 4),
        CatalogEntry::new_trait("xian_yuan", "仙缘深厚", "常有奇遇，前辈高人亦愿提携。", 7),
        CatalogEntry::new_trait("tie_gu", "铁骨铮铮", "筋骨坚韧，不惧皮肉之伤。", 3),
        CatalogEntry::new_trait("ling_mu", "灵目", "一眼可辨灵物品质。", 4),
        CatalogEntry::new_trait("guo_mu_bu_wang", "过目不忘", "功法典籍看过一遍便能记住。", 3),
        CatalogEntry::new_trait("fu_xing", "福星高照", "逢凶化吉，屡有惊无险。", 5),
        // Flaws
        CatalogEntry::new_trait("duan_ming", "短命之相", "寿元天生短于常人。", -5),
        CatalogEntry::new_trait("jing_mai_yu_se", "经脉淤塞", "灵气运转时常滞涩。", -4),
        CatalogEntry::new_trait("xin_mo", "心魔缠身", "突破之时心魔易生。", -6),
        CatalogEntry::new_trait("chou_jia", "仇家遍地", "昔日恩怨未了，仇人随时寻上门来。", -3),
        CatalogEntry::new_trait("tian_du", "天妒英才", "越是出众，劫难越重。", -4),
        // Quirks
        CatalogEntry::new_trait("gu_pi", "性情孤僻", "不喜与人交往。", 0),
        CatalogEntry::new_trait("shi_jiu", "嗜酒如命", "无酒不欢。", 0),
        // Granted by attributes
        CatalogEntry::new_trait("tian_sheng_shen_li", "天生神力", "体魄异于常人，力能扛鼎。", 0)
            .with_threshold(AttributeThreshold::at_least(AttributeType::Physique, 16)),
        CatalogEntry::new_trait("tian_zong_qi_cai", "天纵奇才", "悟性通神，一点即透。", 0)
            .with_threshold(AttributeThreshold::at_least(AttributeType::Comprehension, 18)),
        CatalogEntry::new_trait("yu_dun", "愚钝", "悟性低下，领悟功法格外吃力。", 0)
            .with_threshold(AttributeThreshold::at_most(AttributeType::Comprehension, 2)),
        CatalogEntry::new_trait("ti_ruo_duo_bing", "体弱多病", "根骨孱弱，时常染病。", 0)
            .with_threshold(AttributeThreshold::at_most(AttributeType::Constitution, 2)),
        CatalogEntry::new_trait("ling_jue_min_rui", "灵觉敏锐", "神识初具，可察觉细微灵气波动。", 0)
            .with_threshold(AttributeThreshold::between(AttributeType::Spirit, 14, 17)),
        CatalogEntry::new_trait("shen_shi_tong_tian", "神识通天", "神识之强，同阶罕见。", 0)
            .with_threshold(AttributeThreshold::at_least(AttributeType::Spirit, 18)),
        CatalogEntry::new_trait("qing_cheng", "倾城之姿", "容貌绝世，所到之处引人侧目。", 0)
            .with_threshold(AttributeThreshold::at_least(AttributeType::Charm, 17)),
        CatalogEntry::new_trait("tian_xuan_zhi_ren", "天选之人", "冥冥之中自有天意眷顾。", 0)
            .with_threshold(AttributeThreshold::at_least(AttributeType::Luck, 10)),
        CatalogEntry::new_trait("dao_mei", "霉运缠身", "喝凉水都塞牙。", 0)
            .with_threshold(AttributeThreshold::at_most(AttributeType::Luck, -4)),
    ]
}

pub fn builtin_skills() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new_skill(
            "chang_chun_gong",
            "长春功",
            "最常见的入门吐纳之法。",
            SkillRank::Mortal,
        )
        .with_feature(MasteryLevel::Apprentice, "回春", "运功时缓慢恢复伤势。")
        .with_feature(MasteryLevel::Expert, "生生不息", "灵力自行循环，久战不竭。"),
        CatalogEntry::new_skill("yu_feng_shu", "御风术", "借风而行的轻身小术。", SkillRank::Mortal),
        CatalogEntry::new_skill("huo_qiu_shu", "火球术", "凝聚火灵气伤敌。", SkillRank::Yellow)
            .with_feature(MasteryLevel::Proficient, "连珠火", "一次掐诀连发三枚火球。"),
        CatalogEntry::new_skill("jin_gang_jue", "金刚诀", "护体炼身法门。", SkillRank::Yellow)
            .with_feature(MasteryLevel::Master, "金身不坏", "短时间内刀剑难伤。"),
        CatalogEntry::new_skill(
            "qing_yuan_jian_jue",
            "青元剑诀",
            "以剑气淬炼灵力的剑修功法。",
            SkillRank::Mystic,
        )
        .with_feature(MasteryLevel::Proficient, "剑气化丝", "剑气细如游丝，无孔不入。")
        .with_feature(MasteryLevel::Master, "万剑归宗", "万千剑气合而为一。"),
        CatalogEntry::new_skill(
            "tai_yi_xuan_men",
            "太乙玄门功",
            "玄门正宗心法，根基扎实。",
            SkillRank::Earth,
        ),
        CatalogEntry::new_skill("da_yan_jue", "大衍诀", "专修神识的上古秘术。", SkillRank::Heaven)
            .with_feature(MasteryLevel::Expert, "神识分化", "神识可一心多用。")
            .with_feature(MasteryLevel::Transcendent, "大衍神通", "推演天机，趋吉避凶。"),
        CatalogEntry::new_skill(
            "hun_yuan_dao_jing",
            "混元道经",
            "传说中的仙家真经。",
            SkillRank::Immortal,
        )
        .with_feature(MasteryLevel::Transcendent, "混元归一", "万法归一，返璞归真。"),
        CatalogEntry::new_skill("lei_ling_gen", "雷灵根", "天生亲和雷霆之力。", SkillRank::Earth)
            .with_threshold(AttributeThreshold::at_least(AttributeType::Luck, 12))
            .with_feature(MasteryLevel::Proficient, "引雷", "可引九天雷霆入体淬炼。"),
    ]
}
