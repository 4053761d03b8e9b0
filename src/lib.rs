// =====================================================
// exchange_store
// =====================================================
// 거래소 저장소 셋업 계층
//
// - shared::database: 스키마/테이블 생성 (코인별, 거래쌍별, 경매별)
// - domains::exchange: 코인/거래쌍 모델, 거래쌍 생성기, 최근 체결가 캐시
// =====================================================

pub mod domains;
pub mod shared;
