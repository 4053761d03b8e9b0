use std::fmt;

use serde::{Deserialize, Serialize};

/// 거래쌍 (두 자산의 조합)
/// Trading pair: the market between two assets
///
/// 코인 목록에서 한 번만 생성되며, 두 자산 모두 해당 목록에 속해야 합니다.
/// `Display`가 만드는 문자열 (`"{want}_{have}"`)이 오더북 테이블 이름입니다.
///
/// # Examples
/// ```
/// use exchange_store::domains::exchange::models::Pair;
///
/// let pair = Pair::new("btc", "ltc");
/// assert_eq!(pair.to_string(), "btc_ltc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    /// 받고 싶은 자산
    pub asset_want: String,

    /// 가지고 있는 자산
    pub asset_have: String,
}

impl Pair {
    pub fn new(asset_want: impl Into<String>, asset_have: impl Into<String>) -> Self {
        Self {
            asset_want: asset_want.into(),
            asset_have: asset_have.into(),
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.asset_want, self.asset_have)
    }
}

/// 경매 식별자 (32바이트)
/// Auction identifier; its lowercase hex form names the puzzle table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuctionId(pub [u8; 32]);

impl AuctionId {
    /// 퍼즐 테이블 이름 (64자 소문자 hex)
    pub fn table_name(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}
