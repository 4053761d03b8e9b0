use thiserror::Error;

use crate::domains::exchange::services::pair_generator::PairError;

/// 데이터베이스 셋업 / 가격 캐시 에러
/// Errors raised while provisioning the exchange store or reading the price cache
///
/// 모든 에러는 실패한 스키마/테이블/단계를 함께 담아 호출자에게 그대로 전달됩니다.
/// 재시도는 하지 않습니다. `PriceNotFound`만 정상적인 (예상 가능한) 상황입니다.
#[derive(Error, Debug)]
pub enum DbError {
    /// host:port 주소 해석 실패
    /// Could not resolve the database address
    #[error("Error resolving database address {addr}: {source}")]
    AddressResolution {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// 연결 열기 / ping 실패
    /// Could not open or ping the store
    #[error("{context}: {source}")]
    Connection {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// 스키마 생성 실패
    #[error("Could not create {schema} schema: {source}")]
    SchemaCreation {
        schema: String,
        #[source]
        source: sqlx::Error,
    },

    /// USE <schema> 실패
    #[error("Could not use {schema} schema: {source}")]
    SchemaSelection {
        schema: String,
        #[source]
        source: sqlx::Error,
    },

    /// 테이블 생성 실패
    #[error("Could not create table {table}: {source}")]
    TableCreation {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    /// 새로 만든 테이블 비우기 실패
    #[error("Could not delete rows from table {table} after creating: {source}")]
    TableReset {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    /// 거래쌍 생성 실패 (pair generator가 반환한 에러)
    #[error(transparent)]
    PairDerivation(#[from] PairError),

    /// 가격 캐시에 해당 거래쌍이 없음
    /// Routine miss, not a fault
    #[error("Could not get price, pair not found: {pair}")]
    PriceNotFound { pair: String },

    /// setup_client가 성공하지 않은 상태에서 호출됨
    #[error("Database is not ready: setup_client has not completed successfully")]
    NotReady,

    /// 셋업 단계 실패 (원인 에러를 감쌈)
    #[error("Error setting up {step}: {source}")]
    Setup {
        step: &'static str,
        #[source]
        source: Box<DbError>,
    },
}

impl DbError {
    pub(crate) fn setup(step: &'static str, source: DbError) -> Self {
        DbError::Setup {
            step,
            source: Box::new(source),
        }
    }

    /// `Setup` 래핑을 모두 벗긴 원인 에러
    pub fn root_cause(&self) -> &DbError {
        match self {
            DbError::Setup { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// 가격 캐시 miss인지 여부 (장애와 구분)
    pub fn is_price_miss(&self) -> bool {
        matches!(self.root_cause(), DbError::PriceNotFound { .. })
    }

    /// 에러에 연관된 테이블 이름 (있으면)
    pub fn table(&self) -> Option<&str> {
        match self.root_cause() {
            DbError::TableCreation { table, .. } | DbError::TableReset { table, .. } => {
                Some(table)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_unwraps_setup_layers() {
        let inner = DbError::TableCreation {
            table: "btc".to_string(),
            source: sqlx::Error::Protocol("boom".to_string()),
        };
        let err = DbError::setup("custody tables", DbError::setup("balance tables", inner));

        assert!(matches!(err.root_cause(), DbError::TableCreation { .. }));
        assert_eq!(err.table(), Some("btc"));
        assert!(!err.is_price_miss());
        assert!(err.to_string().contains("custody tables"));
    }

    #[test]
    fn test_price_miss_is_distinguishable() {
        let err = DbError::PriceNotFound {
            pair: "btc_ltc".to_string(),
        };
        assert!(err.is_price_miss());
        assert_eq!(err.table(), None);
    }
}
