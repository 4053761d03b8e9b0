use serde::{Deserialize, Serialize};

/// 스키마 / 테이블 이름 설정
/// Fixed schema and table names used by `Database`
///
/// 프로세스 전역 변수 대신 Database 생성 시 명시적으로 전달됩니다.
/// 여러 Database 인스턴스가 서로 다른 이름으로 독립적으로 동작할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNames {
    /// 잔고 스키마 (코인별 테이블)
    pub balance: String,
    /// 입금 주소 스키마 (코인별 테이블)
    pub deposit: String,
    /// 대기 중 입금 스키마 (코인별 테이블, 셋업마다 초기화)
    pub pending_deposit: String,
    /// 주문 스키마 (거래쌍별 테이블)
    pub order: String,
    /// 피어 스키마
    pub peer: String,
    /// 피어 테이블 이름
    pub peer_table: String,
    /// 경매 퍼즐 스키마 (경매 ID별 테이블)
    pub puzzle: String,
    /// 경매 주문 스키마 (거래쌍별 테이블)
    pub auction_order: String,
}

impl SchemaNames {
    /// 특권 연결로 setup_client 시 생성하는 5개 스키마 (경매 제외)
    pub fn non_auction_schemas(&self) -> [&str; 5] {
        [
            &self.balance,
            &self.deposit,
            &self.pending_deposit,
            &self.order,
            &self.peer,
        ]
    }

    /// 경매 셋업 시 생성하는 스키마
    pub fn auction_schemas(&self) -> [&str; 2] {
        [&self.puzzle, &self.auction_order]
    }
}

impl Default for SchemaNames {
    fn default() -> Self {
        Self {
            balance: "balances".to_string(),
            deposit: "deposit".to_string(),
            pending_deposit: "pending_deposits".to_string(),
            order: "orders".to_string(),
            peer: "peers".to_string(),
            peer_table: "opencxpeers".to_string(),
            puzzle: "puzzle".to_string(),
            auction_order: "auctionorder".to_string(),
        }
    }
}
