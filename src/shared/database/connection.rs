// =====================================================
// Database - 거래소 저장소 핸들
// =====================================================
// 역할:
// 1. 접속 정보 보관 (주소 해석은 ConnectTarget::resolve에서)
// 2. setup_client: 스키마 생성 → 운영 연결 → 거래쌍 생성 → ping → 테이블 생성
// 3. 경매 / 피어 테이블 셋업 (별도 호출)
// 4. 최근 체결가 캐시
//
// 셋업은 동시 트래픽 이전에 한 번, 순차적으로 실행됩니다.
// 셋업 이후에는 Arc<Database>로 공유되며, 가격 캐시만 동시에 변경됩니다.
// 셋업이 실패하면 NotReady 상태로 남고 재시도하지 않습니다.
// =====================================================

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domains::exchange::models::{AuctionId, Coin, Pair};
use crate::domains::exchange::services::{AssetPairGenerator, PairGenerator, PriceCache};
use crate::shared::config::{DbConfig, SchemaNames};
use crate::shared::errors::DbError;

use super::executor::{ConnectTarget, SqlExecutor, StoreConnector};
use super::mysql::MySqlConnector;
use super::provisioning::{create_schema, provision, TableGroup, TableStrategy};
use super::table_specs;

/// 거래소 DB 핸들 (Exchange facade)
pub struct Database {
    connector: Arc<dyn StoreConnector>,
    pair_generator: Arc<dyn PairGenerator>,
    target: ConnectTarget,
    schemas: SchemaNames,

    /// 운영 연결 (setup_client 이후 Some)
    conn: Mutex<Option<Box<dyn SqlExecutor>>>,

    /// 지원 코인 목록 (setup_client에서 설정)
    coins: Vec<Coin>,
    /// 코인 목록에서 생성된 거래쌍 (setup_client에서 한 번 생성)
    pairs: Vec<Pair>,
    prices: PriceCache,
    ready: bool,
}

impl Database {
    /// 연결 대상과 저장소 구현으로 Database 생성 (아직 연결하지 않음)
    pub fn new(target: ConnectTarget, connector: impl StoreConnector + 'static) -> Self {
        Self {
            connector: Arc::new(connector),
            pair_generator: Arc::new(AssetPairGenerator),
            target,
            schemas: SchemaNames::default(),
            conn: Mutex::new(None),
            coins: Vec::new(),
            pairs: Vec::new(),
            prices: PriceCache::new(),
            ready: false,
        }
    }

    /// 접속 정보로 MySQL Database 생성
    /// Resolves `host:port`; no live connection is opened yet.
    ///
    /// # Errors
    /// * `AddressResolution` - 주소를 해석할 수 없음
    pub async fn create_connection(
        username: &str,
        password: &str,
        host: &str,
        port: u16,
    ) -> Result<Self, DbError> {
        let target = ConnectTarget::resolve(username, password, host, port).await?;
        Ok(Self::new(target, MySqlConnector))
    }

    /// 설정으로 Database 생성 (스키마 이름 포함)
    pub async fn from_config(config: &DbConfig) -> Result<Self, DbError> {
        let db = Self::create_connection(&config.username, &config.password, &config.host, config.port)
            .await?;
        Ok(db.with_schemas(config.schemas.clone()))
    }

    pub fn with_schemas(mut self, schemas: SchemaNames) -> Self {
        self.schemas = schemas;
        self
    }

    /// 거래쌍 생성기 교체
    pub fn with_pair_generator(mut self, generator: impl PairGenerator + 'static) -> Self {
        self.pair_generator = Arc::new(generator);
        self
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 셋업 (Setup)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// 클라이언트 셋업
    ///
    /// # 처리 과정
    /// 1. 가격 캐시 초기화
    /// 2. 특권 연결로 5개 스키마 생성 (연결은 항상 닫힘)
    /// 3. 운영 연결 열기 (스키마 선택 없음)
    /// 4. 거래쌍 생성 (실패 시 테이블을 만들기 전에 반환)
    /// 5. ping
    /// 6. custody 테이블 → exchange 테이블
    ///
    /// 3단계 이후 실패하면 운영 연결을 닫고, 코인/거래쌍은 비어 있는 상태로 남습니다.
    pub async fn setup_client(&mut self, coins: Vec<Coin>) -> Result<(), DbError> {
        self.ready = false;
        self.prices.clear();
        self.coins.clear();
        self.pairs.clear();

        if let Some(old) = self.conn.get_mut().take() {
            close_connection(old, "operating").await;
        }

        self.root_init_schemas()
            .await
            .map_err(|e| DbError::setup("root schemas", e))?;

        let conn = self
            .connector
            .connect(&self.target)
            .await
            .map_err(|source| DbError::Connection {
                context: "Error opening database",
                source,
            })?;
        *self.conn.get_mut() = Some(conn);

        // 이후 단계가 실패하면 운영 연결도 닫음
        if let Err(e) = self.provision_client(coins).await {
            if let Some(conn) = self.conn.get_mut().take() {
                close_connection(conn, "operating").await;
            }
            return Err(e);
        }

        self.ready = true;
        tracing::info!(
            addr = %self.target.addr,
            network = self.target.network(),
            coins = self.coins.len(),
            pairs = self.pairs.len(),
            "exchange database ready"
        );
        Ok(())
    }

    /// setup_client 4~6단계: 거래쌍 생성 → ping → 테이블
    async fn provision_client(&mut self, coins: Vec<Coin>) -> Result<(), DbError> {
        // 코인과 거래쌍은 생성이 성공했을 때만 함께 교체
        let pairs = self.pair_generator.generate_asset_pairs(&coins)?;
        self.coins = coins;
        self.pairs = pairs;

        for (i, coin) in self.coins.iter().enumerate() {
            tracing::debug!("Asset {}: {}", i, coin.name);
        }
        for (i, pair) in self.pairs.iter().enumerate() {
            tracing::debug!("Pair {}: {}", i, pair);
        }

        let conn = self.conn.get_mut().as_mut().ok_or(DbError::NotReady)?;
        conn.ping().await.map_err(|source| DbError::Connection {
            context: "Could not ping the database, is it running",
            source,
        })?;

        self.setup_custody_tables()
            .await
            .map_err(|e| DbError::setup("custody tables", e))?;
        self.setup_exchange_tables()
            .await
            .map_err(|e| DbError::setup("exchange tables", e))?;
        Ok(())
    }

    /// 잔고 / 입금 / 대기 중 입금 테이블
    pub async fn setup_custody_tables(&self) -> Result<(), DbError> {
        let groups = [
            (
                "balance tables",
                TableGroup::new(&self.schemas.balance, table_specs::BALANCE, TableStrategy::PerCoin),
            ),
            (
                "deposit tables",
                TableGroup::new(&self.schemas.deposit, table_specs::DEPOSIT, TableStrategy::PerCoin),
            ),
            (
                "pending deposit tables",
                TableGroup::new(
                    &self.schemas.pending_deposit,
                    table_specs::PENDING_DEPOSIT,
                    TableStrategy::PerCoinDestructive,
                ),
            ),
        ];
        self.provision_groups(&groups).await
    }

    /// 오더북 테이블 (거래쌍별)
    pub async fn setup_exchange_tables(&self) -> Result<(), DbError> {
        let groups = [(
            "order tables",
            TableGroup::new(&self.schemas.order, table_specs::ORDER, TableStrategy::PerPair),
        )];
        self.provision_groups(&groups).await
    }

    /// 피어 저장소용 테이블 (단일)
    pub async fn setup_peer_tables(&self, peer_schema: &str, peer_table: &str) -> Result<(), DbError> {
        self.ensure_ready()?;
        let groups = [(
            "peer tables",
            TableGroup::new(
                peer_schema,
                table_specs::PEER,
                TableStrategy::Singleton(peer_table.to_string()),
            ),
        )];
        self.provision_groups(&groups).await
    }

    /// 경매 주문 테이블 (거래쌍별) + 경매 ID 퍼즐 테이블
    ///
    /// 경매마다 여러 번 호출될 수 있습니다. 퍼즐 테이블은 삭제하지 않습니다.
    pub async fn setup_auction_tables(&self, auction_id: AuctionId) -> Result<(), DbError> {
        self.ensure_ready()?;

        {
            let mut guard = self.conn.lock().await;
            let conn = guard.as_mut().ok_or(DbError::NotReady)?;
            for schema in self.schemas.auction_schemas() {
                create_schema(conn.as_mut(), schema)
                    .await
                    .map_err(|e| DbError::setup("auction schemas", e))?;
            }
        }

        let groups = [
            (
                "auction order tables",
                TableGroup::new(
                    &self.schemas.auction_order,
                    table_specs::AUCTION_ORDER,
                    TableStrategy::PerPair,
                ),
            ),
            (
                "puzzle tables",
                TableGroup::new(
                    &self.schemas.puzzle,
                    table_specs::PUZZLE,
                    TableStrategy::Singleton(auction_id.table_name()),
                ),
            ),
        ];
        self.provision_groups(&groups).await?;

        tracing::info!(auction = %auction_id.table_name(), "auction tables ready");
        Ok(())
    }

    /// 운영 연결 닫기
    pub async fn close(&mut self) {
        self.ready = false;
        if let Some(conn) = self.conn.get_mut().take() {
            close_connection(conn, "operating").await;
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 가격 / 거래쌍 조회
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// 최근 체결가 설정 (체결 경로에서 호출)
    pub fn set_price(&self, pair: &str, price: f64) {
        self.prices.set_price(pair, price);
    }

    /// 최근 체결가 조회
    ///
    /// 설정된 적이 없으면 `DbError::PriceNotFound`
    pub fn get_price(&self, pair: &str) -> Result<f64, DbError> {
        self.prices.get_price(pair)
    }

    /// setup_client에서 생성된 거래쌍 목록
    pub fn get_pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn schemas(&self) -> &SchemaNames {
        &self.schemas
    }

    pub fn price_cache(&self) -> &PriceCache {
        &self.prices
    }

    pub fn addr(&self) -> SocketAddr {
        self.target.addr
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 내부 헬퍼
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    fn ensure_ready(&self) -> Result<(), DbError> {
        if self.ready {
            Ok(())
        } else {
            Err(DbError::NotReady)
        }
    }

    async fn provision_groups(&self, groups: &[(&'static str, TableGroup<'_>)]) -> Result<(), DbError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DbError::NotReady)?;

        for (step, group) in groups {
            let step: &'static str = *step;
            let tables = provision(conn.as_mut(), group, &self.coins, &self.pairs)
                .await
                .map_err(|e| DbError::setup(step, e))?;
            tracing::info!(schema = group.schema, tables, "initialized {}", step);
        }
        Ok(())
    }

    /// 특권 연결로 스키마 생성. 연결은 성공/실패와 관계없이 닫힘
    async fn root_init_schemas(&self) -> Result<(), DbError> {
        let mut root = self
            .connector
            .connect(&self.target)
            .await
            .map_err(|source| DbError::Connection {
                context: "Error opening root connection",
                source,
            })?;

        let result = self.root_create_schemas(root.as_mut()).await;
        close_connection(root, "root").await;
        result
    }

    async fn root_create_schemas(&self, root: &mut dyn SqlExecutor) -> Result<(), DbError> {
        root.ping().await.map_err(|source| DbError::Connection {
            context: "Could not ping the database, is it running",
            source,
        })?;

        for schema in self.schemas.non_auction_schemas() {
            create_schema(root, schema).await?;
        }
        tracing::info!(user = %self.target.username, "root initialized schemas");
        Ok(())
    }
}

async fn close_connection(conn: Box<dyn SqlExecutor>, which: &'static str) {
    if let Err(e) = conn.close().await {
        tracing::warn!(connection = which, error = %e, "failed to close connection");
    }
}

impl ConnectTarget {
    /// host:port를 해석해 연결 대상 생성
    pub async fn resolve(
        username: &str,
        password: &str,
        host: &str,
        port: u16,
    ) -> Result<Self, DbError> {
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
            addr: resolve_addr(host, port).await?,
        })
    }
}

/// host:port 해석 (IPv6 호스트는 대괄호로 감쌈)
async fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr, DbError> {
    let addr = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    };

    let first = tokio::net::lookup_host(addr.clone())
        .await
        .map_err(|source| DbError::AddressResolution {
            addr: addr.clone(),
            source,
        })?
        .next();

    first.ok_or_else(|| DbError::AddressResolution {
        addr,
        source: io::Error::new(io::ErrorKind::NotFound, "no addresses found"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_ipv4_and_ipv6() {
        let v4 = resolve_addr("127.0.0.1", 3306).await.unwrap();
        assert_eq!(v4.port(), 3306);
        assert!(v4.is_ipv4());

        let v6 = resolve_addr("::1", 3307).await.unwrap();
        assert!(v6.is_ipv6());
        assert_eq!(v6.port(), 3307);
    }

    #[tokio::test]
    async fn test_resolved_target_keeps_credentials() {
        let target = ConnectTarget::resolve("opencx", "secret", "127.0.0.1", 3307).await.unwrap();
        assert_eq!(target.username, "opencx");
        assert_eq!(target.password, "secret");
        assert_eq!(target.addr, "127.0.0.1:3307".parse().unwrap());
    }

    #[tokio::test]
    async fn test_unresolvable_host_fails() {
        let err = resolve_addr("not a host name", 3306).await.unwrap_err();
        assert!(matches!(err, DbError::AddressResolution { .. }));
    }

    #[tokio::test]
    async fn test_from_config_carries_schema_names() {
        let mut config = DbConfig::from_lookup(|key| match key {
            "DB_HOST" => Some("127.0.0.1".to_string()),
            "DB_PORT" => Some("3307".to_string()),
            _ => None,
        });
        config.schemas.balance = "custody_balances".to_string();

        let db = Database::from_config(&config).await.unwrap();
        assert_eq!(db.schemas().balance, "custody_balances");
        assert_eq!(db.addr().port(), 3307);
    }

    #[tokio::test]
    async fn test_fresh_database_is_not_ready() {
        let db = Database::create_connection("root", "", "127.0.0.1", 3306).await.unwrap();
        assert!(!db.is_ready());
        assert!(db.get_pairs().is_empty());
        assert!(matches!(
            db.setup_auction_tables(AuctionId([0u8; 32])).await,
            Err(DbError::NotReady)
        ));
    }
}
