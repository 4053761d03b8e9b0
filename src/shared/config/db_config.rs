// =====================================================
// DbConfig - 데이터베이스 접속 설정 (환경 변수)
// =====================================================
// 환경 변수                기본값
// DB_USER                  root
// DB_PASSWORD              (빈 문자열)
// DB_HOST                  localhost
// DB_PORT                  3306
// EXCHANGE_COINS           btc,ltc,vtc
// =====================================================

use crate::domains::exchange::models::Coin;
use crate::domains::exchange::services::pair_generator::supported_coin;
use crate::shared::config::SchemaNames;

pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_COINS: &str = "btc,ltc,vtc";

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// 지원 코인 이름 목록 (설정 순서 유지)
    pub coin_names: Vec<String>,
    pub schemas: SchemaNames,
}

impl DbConfig {
    /// 환경 변수에서 설정 읽기
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 key → value 조회 함수로 설정 읽기 (테스트용으로도 사용)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup("DB_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid DB_PORT, falling back to {}", DEFAULT_DB_PORT);
                DEFAULT_DB_PORT
            }),
            None => DEFAULT_DB_PORT,
        };

        let coins = lookup("EXCHANGE_COINS").unwrap_or_else(|| DEFAULT_COINS.to_string());

        Self {
            username: lookup("DB_USER").unwrap_or_else(|| "root".to_string()),
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port,
            coin_names: parse_coin_names(&coins),
            schemas: SchemaNames::default(),
        }
    }

    /// 코인 이름 → Coin 목록
    ///
    /// 지원 목록에 없는 이름도 그대로 Coin으로 만들어 둡니다.
    /// 거래쌍 생성 단계에서 UnsupportedCoin으로 거부됩니다.
    pub fn coins(&self) -> Vec<Coin> {
        self.coin_names
            .iter()
            .map(|name| supported_coin(name).unwrap_or_else(|| Coin::new(name.as_str(), 0, false)))
            .collect()
    }
}

fn parse_coin_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
