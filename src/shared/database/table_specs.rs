// =====================================================
// 테이블 컬럼 spec (MySQL / MariaDB 방언)
// =====================================================
// provisioning 단계에 불투명 문자열로 전달됩니다.
// 문법 검증은 하지 않으며, 잘못된 spec은 DB가 거부합니다.
//
// pubkey는 최대 66바이트
// price는 전체 30자리, 소수점 이하 10자리
// =====================================================

/// 잔고 (코인별)
pub const BALANCE: &str = "pubkey VARBINARY(66), balance BIGINT(64)";

/// 입금 주소 (코인별)
pub const DEPOSIT: &str =
    "pubkey VARBINARY(66), address VARCHAR(34), CONSTRAINT unique_pubkeys UNIQUE (pubkey, address)";

/// 대기 중 입금 (코인별, 셋업마다 초기화)
pub const PENDING_DEPOSIT: &str = "pubkey VARBINARY(66), expectedConfirmHeight INT(32) UNSIGNED, depositHeight INT(32) UNSIGNED, amount BIGINT(64), txid TEXT";

/// 주문 (거래쌍별)
pub const ORDER: &str = "pubkey VARBINARY(66), orderID TEXT, side TEXT, price DECIMAL(30,10) UNSIGNED, amountHave BIGINT(64), amountWant BIGINT(64), time TIMESTAMP";

/// 경매 주문 (거래쌍별): 주문 컬럼 + 경매 ID, nonce, 해시된 주문
pub const AUCTION_ORDER: &str = "pubkey VARBINARY(66), orderID TEXT, side TEXT, price DECIMAL(30,10) UNSIGNED, amountHave BIGINT(64), amountWant BIGINT(64), time TIMESTAMP, auctionID VARBINARY(64), nonce VARBINARY(4), hashedOrder BLOB";

/// 피어 디렉터리 (단일 테이블)
pub const PEER: &str = "lnaddr VARBINARY(40), name TEXT, netaddr TEXT, peerIdx INT(32) UNSIGNED";

/// 경매 퍼즐 (경매 ID별 단일 테이블)
pub const PUZZLE: &str = "encodedPuzzle BLOB, selected BOOLEAN";
