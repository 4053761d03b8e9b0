// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 메모리 저장소 기반 Database 셋업/검증 함수 제공
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let (db, store) = setup_test().await;
//     // 테스트 코드...
// }
// ```
// =====================================================
#![allow(dead_code)]

use exchange_store::domains::exchange::models::{Coin, Pair};
use exchange_store::domains::exchange::services::{supported_coin, PairError, PairGenerator};
use exchange_store::shared::config::SchemaNames;
use exchange_store::shared::database::{ConnectTarget, Database, MemoryStore};

// 테스트용 상수
pub const TEST_HOST: &str = "127.0.0.1";
pub const TEST_PORT: u16 = 3306;
pub const TEST_USER: &str = "opencx";
pub const TEST_PASSWORD: &str = "testpass";

/// btc, ltc, vtc
pub fn test_coins() -> Vec<Coin> {
    ["btc", "ltc", "vtc"]
        .iter()
        .map(|name| supported_coin(name).expect("supported coin"))
        .collect()
}

/// 메모리 저장소에 연결되는 (아직 셋업 안 된) Database
pub async fn new_test_db(store: &MemoryStore) -> Database {
    let target = ConnectTarget::resolve(TEST_USER, TEST_PASSWORD, TEST_HOST, TEST_PORT)
        .await
        .expect("Failed to resolve test address");
    Database::new(target, store.connector())
}

/// 테스트 전 초기화: 새 저장소 + setup_client 완료된 Database
pub async fn setup_test() -> (Database, MemoryStore) {
    let store = MemoryStore::new();
    let mut db = new_test_db(&store).await;
    db.setup_client(test_coins())
        .await
        .expect("Failed to set up client");
    (db, store)
}

/// 기본 스키마 이름
pub fn schemas() -> SchemaNames {
    SchemaNames::default()
}

/// 항상 실패하는 거래쌍 생성기
pub struct FailingPairGenerator;

impl PairGenerator for FailingPairGenerator {
    fn generate_asset_pairs(&self, coins: &[Coin]) -> Result<Vec<Pair>, PairError> {
        Err(PairError::UnsupportedCoin {
            name: coins.first().map(|c| c.name.clone()).unwrap_or_default(),
        })
    }
}

/// 모든 스키마의 테이블 수 합계
pub fn total_tables(store: &MemoryStore) -> usize {
    store.schemas().iter().map(|s| store.tables(s).len()).sum()
}
