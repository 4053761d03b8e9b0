use serde::{Deserialize, Serialize};

/// 거래소가 지원하는 자산 (코인) 설명자
/// Asset descriptor supplied at startup
///
/// `name`은 설정된 식별자이며 per-coin 테이블 이름으로 그대로 사용됩니다.
/// `name` is the configured identifier and doubles as the per-coin table name.
///
/// # Examples
/// ```
/// use exchange_store::domains::exchange::models::Coin;
///
/// let btc = Coin::new("btc", 0, false);
/// assert_eq!(btc.name, "btc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// 코인 식별자 (예: "btc", "ltc", "vtc")
    pub name: String,

    /// BIP44 HD coin type
    pub hd_coin_type: u32,

    /// 테스트넷 여부
    pub test_net: bool,
}

impl Coin {
    pub fn new(name: impl Into<String>, hd_coin_type: u32, test_net: bool) -> Self {
        Self {
            name: name.into(),
            hd_coin_type,
            test_net,
        }
    }
}
