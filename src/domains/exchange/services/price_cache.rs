// =====================================================
// PriceCache - 최근 체결가 메모리 캐시
// =====================================================
// 역할: 거래쌍 → 마지막 체결가
//
// - 체결 경로(서버)가 쓰고, 클라이언트 쪽 코드가 읽는다
// - 하나의 Mutex가 읽기/쓰기 모두를 직렬화 (RwLock 분리 없음)
// - 영속화/만료/eviction 없음. 수명 = Database 인스턴스 수명
// - 키가 없으면 "가격 모름" (0.0과 구분)
// =====================================================

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::shared::errors::DbError;

#[derive(Debug, Default)]
pub struct PriceCache {
    prices: Mutex<HashMap<String, f64>>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 가격 설정 (무조건 덮어씀)
    pub fn set_price(&self, pair: &str, price: f64) {
        self.prices.lock().insert(pair.to_string(), price);
    }

    /// 마지막으로 설정된 가격 조회
    ///
    /// # Returns
    /// * `Ok(price)` - 설정된 가격 (0.0일 수도 있음)
    /// * `Err(DbError::PriceNotFound)` - 설정된 적 없음
    pub fn get_price(&self, pair: &str) -> Result<f64, DbError> {
        self.prices
            .lock()
            .get(pair)
            .copied()
            .ok_or_else(|| DbError::PriceNotFound {
                pair: pair.to_string(),
            })
    }

    pub fn clear(&self) {
        self.prices.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.prices.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.lock().is_empty()
    }
}
