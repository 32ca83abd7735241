use phf::phf_map;

/// 输出语言枚举
///
/// 五种固定的输出语言，顺序即提示词约定的输出顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Language {
    /// 泰卢固语
    Telugu,
    /// 印地语
    Hindi,
    /// 卡纳达语
    Kannada,
    /// 泰米尔语
    Tamil,
    /// 英语
    English,
}

/// 别名查找表（小写名称 / ISO-639 代码 → 标准标签）
static LANGUAGE_ALIASES: phf::Map<&'static str, Language> = phf_map! {
    "telugu" => Language::Telugu,
    "te" => Language::Telugu,
    "hindi" => Language::Hindi,
    "hi" => Language::Hindi,
    "kannada" => Language::Kannada,
    "kn" => Language::Kannada,
    "tamil" => Language::Tamil,
    "ta" => Language::Tamil,
    "english" => Language::English,
    "en" => Language::English,
};

impl Language {
    /// 全部语言，按提示词约定的输出顺序
    pub const ALL: [Language; 5] = [
        Language::Telugu,
        Language::Hindi,
        Language::Kannada,
        Language::Tamil,
        Language::English,
    ];

    /// 获取标准标签（与 JSON 载荷中的枚举值一致）
    pub fn name(self) -> &'static str {
        match self {
            Language::Telugu => "Telugu",
            Language::Hindi => "Hindi",
            Language::Kannada => "Kannada",
            Language::Tamil => "Tamil",
            Language::English => "English",
        }
    }

    /// 尝试从字符串解析语言（支持标准标签、小写名称和 ISO 代码）
    pub fn find(s: &str) -> Option<Self> {
        LANGUAGE_ALIASES.get(s.to_lowercase().trim()).copied()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
