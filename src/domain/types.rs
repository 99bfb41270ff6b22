// ==========================================
// 家禽生产分析系统 - 领域类型定义
// ==========================================
// 生产类型 / 批次状态 / 遗传品系 / 通风状态 / 告警级别 / 蛋品颜色与等级
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 生产类型 (Production Type)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与存储层一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionType {
    Broiler, // 肉鸡
    Layer,   // 蛋鸡
}

impl fmt::Display for ProductionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductionType::Broiler => write!(f, "BROILER"),
            ProductionType::Layer => write!(f, "LAYER"),
        }
    }
}

// ==========================================
// 批次状态 (Batch Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Active,   // 在养
    Finished, // 已出栏
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Active => write!(f, "ACTIVE"),
            BatchStatus::Finished => write!(f, "FINISHED"),
        }
    }
}

// ==========================================
// 遗传品系 (Genetic Line)
// ==========================================
// 未识别的品系保留原始代码,由各查表处使用回退项
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GeneticLine {
    Cobb500,
    Ross308,
    HylineBrown,
    LohmannBrown,
    Leghorn,
    IsaBrown,
    Babcock,
    Araucana,
    Other(String),
}

impl GeneticLine {
    /// 品系代码（存储层格式）
    pub fn code(&self) -> &str {
        match self {
            GeneticLine::Cobb500 => "COBB500",
            GeneticLine::Ross308 => "ROSS308",
            GeneticLine::HylineBrown => "HYLINE_BROWN",
            GeneticLine::LohmannBrown => "LOHMAN_BROWN",
            GeneticLine::Leghorn => "LEGHORN",
            GeneticLine::IsaBrown => "ISA_BROWN",
            GeneticLine::Babcock => "BABCOCK",
            GeneticLine::Araucana => "ARAUCANA",
            GeneticLine::Other(code) => code.as_str(),
        }
    }
}

impl From<&str> for GeneticLine {
    fn from(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "COBB500" => GeneticLine::Cobb500,
            "ROSS308" => GeneticLine::Ross308,
            "HYLINE_BROWN" => GeneticLine::HylineBrown,
            "LOHMAN_BROWN" | "LOHMANN_BROWN" => GeneticLine::LohmannBrown,
            "LEGHORN" => GeneticLine::Leghorn,
            "ISA_BROWN" => GeneticLine::IsaBrown,
            "BABCOCK" => GeneticLine::Babcock,
            "ARAUCANA" => GeneticLine::Araucana,
            _ => GeneticLine::Other(raw.trim().to_string()),
        }
    }
}

impl From<String> for GeneticLine {
    fn from(raw: String) -> Self {
        GeneticLine::from(raw.as_str())
    }
}

impl From<GeneticLine> for String {
    fn from(line: GeneticLine) -> Self {
        line.code().to_string()
    }
}

impl FromStr for GeneticLine {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(GeneticLine::from(s))
    }
}

impl fmt::Display for GeneticLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 通风状态 (Ventilation Status)
// ==========================================
// 顺序: Excellent < Good < Fair < Poor < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VentilationStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl fmt::Display for VentilationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VentilationStatus::Excellent => write!(f, "excellent"),
            VentilationStatus::Good => write!(f, "good"),
            VentilationStatus::Fair => write!(f, "fair"),
            VentilationStatus::Poor => write!(f, "poor"),
            VentilationStatus::Critical => write!(f, "critical"),
        }
    }
}

// ==========================================
// 采食活跃度 (Feeding Activity Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedingActivityLevel {
    Low,
    Normal,
    High,
}

impl fmt::Display for FeedingActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedingActivityLevel::Low => write!(f, "low"),
            FeedingActivityLevel::Normal => write!(f, "normal"),
            FeedingActivityLevel::High => write!(f, "high"),
        }
    }
}

// ==========================================
// 告警级别 (Alert Severity)
// ==========================================
// 顺序: Info < Warning < Critical < Emergency
// Emergency 仅由环境评分引擎产生
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
    Emergency,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Info => write!(f, "info"),
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Critical => write!(f, "critical"),
            AlertSeverity::Emergency => write!(f, "emergency"),
        }
    }
}

// ==========================================
// 蛋壳颜色 (Egg Color)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EggColor {
    White,
    Brown,
    Blue,
    Cream,
}

impl fmt::Display for EggColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EggColor::White => write!(f, "white"),
            EggColor::Brown => write!(f, "brown"),
            EggColor::Blue => write!(f, "blue"),
            EggColor::Cream => write!(f, "cream"),
        }
    }
}

// ==========================================
// 蛋品等级 (Egg Grade)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EggGrade {
    #[serde(rename = "XL")]
    Xl,
    #[serde(rename = "L")]
    L,
    #[serde(rename = "M")]
    M,
    #[serde(rename = "S")]
    S,
    #[serde(rename = "cracked")]
    Cracked,
    #[serde(rename = "dirty")]
    Dirty,
}

impl EggGrade {
    pub const ALL: [EggGrade; 6] = [
        EggGrade::Xl,
        EggGrade::L,
        EggGrade::M,
        EggGrade::S,
        EggGrade::Cracked,
        EggGrade::Dirty,
    ];

    /// 是否可售等级 (XL/L/M)
    pub fn is_marketable(&self) -> bool {
        matches!(self, EggGrade::Xl | EggGrade::L | EggGrade::M)
    }
}

impl fmt::Display for EggGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EggGrade::Xl => write!(f, "XL"),
            EggGrade::L => write!(f, "L"),
            EggGrade::M => write!(f, "M"),
            EggGrade::S => write!(f, "S"),
            EggGrade::Cracked => write!(f, "cracked"),
            EggGrade::Dirty => write!(f, "dirty"),
        }
    }
}
