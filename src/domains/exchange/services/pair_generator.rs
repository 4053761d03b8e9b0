// =====================================================
// PairGenerator - 코인 목록 → 거래쌍 목록
// =====================================================
// 역할: 셋업 시점에 한 번, 코인 목록에서 지원하는 모든 거래쌍을 생성
//
// 규칙 (AssetPairGenerator):
// 1. 목록 순서대로 모든 조합 (i < j)을 만든다 → N*(N-1)/2 개
// 2. 앞선 코인이 asset_want, 뒤의 코인이 asset_have
// 3. 지원하지 않는 코인이나 중복 코인이 있으면 실패
//
// 결과는 결정적이며, DB는 이 결과를 유일한 거래쌍 집합으로 신뢰한다.
// =====================================================

use std::collections::HashSet;

use thiserror::Error;

use crate::domains::exchange::models::{Coin, Pair};

/// 지원 자산 목록: (이름, HD coin type, 테스트넷 여부)
pub const SUPPORTED_ASSETS: &[(&str, u32, bool)] = &[
    ("btc", 0, false),
    ("ltc", 2, false),
    ("vtc", 28, false),
    ("testnet3", 1, true),
    ("regtest", 257, true),
    ("litetest4", 65537, true),
    ("litereg", 258, true),
    ("vtctest", 65536, true),
    ("vtcreg", 262, true),
];

/// 이름으로 지원 코인 조회
pub fn supported_coin(name: &str) -> Option<Coin> {
    SUPPORTED_ASSETS
        .iter()
        .find(|(asset, _, _)| *asset == name)
        .map(|(asset, hd_coin_type, test_net)| Coin::new(*asset, *hd_coin_type, *test_net))
}

/// 거래쌍 생성 에러
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PairError {
    /// 지원하지 않는 코인
    #[error("Unsupported coin for pair generation: {name}")]
    UnsupportedCoin { name: String },

    /// 같은 코인이 두 번 이상 나옴
    #[error("Duplicate coin in coin list: {name}")]
    DuplicateCoin { name: String },
}

/// 거래쌍 생성기 인터페이스
/// Pair derivation capability consumed by `Database::setup_client`
pub trait PairGenerator: Send + Sync {
    fn generate_asset_pairs(&self, coins: &[Coin]) -> Result<Vec<Pair>, PairError>;
}

/// 기본 거래쌍 생성기 (지원 자산 목록 기반)
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetPairGenerator;

impl PairGenerator for AssetPairGenerator {
    fn generate_asset_pairs(&self, coins: &[Coin]) -> Result<Vec<Pair>, PairError> {
        let mut seen = HashSet::with_capacity(coins.len());
        for coin in coins {
            if supported_coin(&coin.name).is_none() {
                return Err(PairError::UnsupportedCoin {
                    name: coin.name.clone(),
                });
            }
            if !seen.insert(coin.name.as_str()) {
                return Err(PairError::DuplicateCoin {
                    name: coin.name.clone(),
                });
            }
        }

        let mut pairs = Vec::with_capacity(coins.len() * coins.len().saturating_sub(1) / 2);
        for (i, want) in coins.iter().enumerate() {
            for have in &coins[i + 1..] {
                pairs.push(Pair::new(want.name.clone(), have.name.clone()));
            }
        }

        Ok(pairs)
    }
}
