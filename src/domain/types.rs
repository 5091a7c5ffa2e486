// ==========================================
// 航班数据分析系统 - 基础类型定义
// ==========================================
// 依据: flight_data_2024 数据字典
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// CancellationReason - 取消原因
// ==========================================
// 对应数据集 cancellation_code 列:
//   A=承运人 B=天气 C=国家空管系统 D=安全
// 清洗后未取消航班统一写入 "Not Cancelled"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancellationReason {
    Carrier,           // A
    Weather,           // B
    NationalAirSystem, // C
    Security,          // D
    NotCancelled,      // 清洗填充值
}

impl CancellationReason {
    /// 从数据集代码解析（大小写不敏感）
    ///
    /// # 返回
    /// - Some(reason): 可识别的代码
    /// - None: 空值或未知代码
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "A" => Some(Self::Carrier),
            "B" => Some(Self::Weather),
            "C" => Some(Self::NationalAirSystem),
            "D" => Some(Self::Security),
            "NOT CANCELLED" => Some(Self::NotCancelled),
            _ => None,
        }
    }

    /// 数据集代码（写库口径）
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Carrier => "A",
            Self::Weather => "B",
            Self::NationalAirSystem => "C",
            Self::Security => "D",
            Self::NotCancelled => "Not Cancelled",
        }
    }

    /// 报表展示用标签
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Carrier => "Carrier",
            Self::Weather => "Weather",
            Self::NationalAirSystem => "National Air System",
            Self::Security => "Security",
            Self::NotCancelled => "Not Cancelled",
        }
    }
}

// ==========================================
// DelayCause - 延误原因维度
// ==========================================
// 对应 5 个延误分钟数列，用于延误归因统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelayCause {
    Carrier,      // carrier_delay
    Weather,      // weather_delay
    Nas,          // nas_delay
    Security,     // security_delay
    LateAircraft, // late_aircraft_delay
}

impl DelayCause {
    pub const ALL: [DelayCause; 5] = [
        Self::Carrier,
        Self::Weather,
        Self::Nas,
        Self::Security,
        Self::LateAircraft,
    ];

    /// 对应的数据库列名
    pub fn column(&self) -> &'static str {
        match self {
            Self::Carrier => "carrier_delay",
            Self::Weather => "weather_delay",
            Self::Nas => "nas_delay",
            Self::Security => "security_delay",
            Self::LateAircraft => "late_aircraft_delay",
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Carrier => "Carrier",
            Self::Weather => "Weather",
            Self::Nas => "National Air System",
            Self::Security => "Security",
            Self::LateAircraft => "Late Aircraft",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_reason_from_code() {
        assert_eq!(
            CancellationReason::from_code("A"),
            Some(CancellationReason::Carrier)
        );
        assert_eq!(
            CancellationReason::from_code(" b "),
            Some(CancellationReason::Weather)
        );
        assert_eq!(
            CancellationReason::from_code("Not Cancelled"),
            Some(CancellationReason::NotCancelled)
        );
        assert_eq!(CancellationReason::from_code("Z"), None);
        assert_eq!(CancellationReason::from_code(""), None);
    }

    #[test]
    fn test_delay_cause_columns() {
        let cols: Vec<&str> = DelayCause::ALL.iter().map(|c| c.column()).collect();
        assert_eq!(cols.len(), 5);
        assert!(cols.contains(&"late_aircraft_delay"));
    }
}
