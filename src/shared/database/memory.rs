// =====================================================
// MemoryStore - 메모리 기반 저장소 (테스트 / dry-run용)
// =====================================================
// 실제 DB 없이 Database 셋업 로직을 검증하기 위한 구현입니다.
//
// 흉내내는 것:
// - 스키마 / 테이블 / 테이블별 row 수
// - 세션별 현재 스키마 (USE)
// - 실행된 DDL 로그, 열린 연결 수
// - 연결 불가 상태, 특정 이름에 대한 실패 주입
// - N번째 이후 연결의 ping 실패, 특정 테이블의 DELETE 실패
//
// 컬럼 spec 문법은 검사하지 않습니다 (문자열 그대로 보관).
// =====================================================

use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::executor::{ConnectTarget, Ddl, SqlExecutor, StoreConnector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTable {
    pub spec: String,
    pub rows: usize,
}

#[derive(Debug, Default)]
struct StoreState {
    schemas: BTreeMap<String, BTreeMap<String, MemoryTable>>,
    log: Vec<String>,
    open_connections: usize,
    total_connections: usize,
    unreachable: bool,
    fail_on: Option<String>,
    fail_ping_after: Option<usize>,
    fail_delete_on: Option<String>,
}

/// 공유 가능한 메모리 저장소 핸들 (clone은 같은 저장소를 가리킴)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connector(&self) -> MemoryConnector {
        MemoryConnector { store: self.clone() }
    }

    /// true면 연결/ping/실행이 모두 실패
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unreachable = unreachable;
    }

    /// 이 이름을 대상으로 하는 문장은 실패 (None이면 해제)
    pub fn fail_on(&self, name: Option<&str>) {
        self.state.lock().fail_on = name.map(str::to_string);
    }

    /// 처음 `connections`개 이후에 열린 연결은 ping 실패 (None이면 해제)
    ///
    /// 셋업에서 특권 연결이 1번, 운영 연결이 2번입니다.
    pub fn fail_ping_after(&self, connections: Option<usize>) {
        self.state.lock().fail_ping_after = connections;
    }

    /// 이 테이블에 대한 DELETE만 실패 (None이면 해제)
    pub fn fail_delete_on(&self, table: Option<&str>) {
        self.state.lock().fail_delete_on = table.map(str::to_string);
    }

    pub fn schemas(&self) -> Vec<String> {
        self.state.lock().schemas.keys().cloned().collect()
    }

    pub fn tables(&self, schema: &str) -> Vec<String> {
        self.state
            .lock()
            .schemas
            .get(schema)
            .map(|tables| tables.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_table(&self, schema: &str, table: &str) -> bool {
        self.table(schema, table).is_some()
    }

    pub fn table(&self, schema: &str, table: &str) -> Option<MemoryTable> {
        self.state
            .lock()
            .schemas
            .get(schema)
            .and_then(|tables| tables.get(table))
            .cloned()
    }

    pub fn row_count(&self, schema: &str, table: &str) -> Option<usize> {
        self.table(schema, table).map(|t| t.rows)
    }

    /// 테이블에 row 추가 (테이블이 없으면 false)
    pub fn insert_rows(&self, schema: &str, table: &str, count: usize) -> bool {
        let mut state = self.state.lock();
        match state.schemas.get_mut(schema).and_then(|t| t.get_mut(table)) {
            Some(t) => {
                t.rows += count;
                true
            }
            None => false,
        }
    }

    /// 실행된 DDL (MySQL 방언 문자열)
    pub fn log(&self) -> Vec<String> {
        self.state.lock().log.clone()
    }

    pub fn open_connections(&self) -> usize {
        self.state.lock().open_connections
    }

    /// 지금까지 열린 연결 수 (닫힌 것 포함)
    pub fn total_connections(&self) -> usize {
        self.state.lock().total_connections
    }
}

fn unreachable_error() -> sqlx::Error {
    sqlx::Error::Io(io::Error::new(
        io::ErrorKind::ConnectionRefused,
        "memory store is unreachable",
    ))
}

#[derive(Debug, Clone)]
pub struct MemoryConnector {
    store: MemoryStore,
}

#[async_trait]
impl StoreConnector for MemoryConnector {
    async fn connect(&self, _target: &ConnectTarget) -> Result<Box<dyn SqlExecutor>, sqlx::Error> {
        let mut state = self.store.state.lock();
        if state.unreachable {
            return Err(unreachable_error());
        }
        state.open_connections += 1;
        state.total_connections += 1;
        let id = state.total_connections;
        drop(state);

        Ok(Box::new(MemoryExecutor {
            store: self.store.clone(),
            id,
            current_schema: None,
        }))
    }
}

/// 하나의 메모리 세션. drop되면 연결이 닫힌 것으로 집계됩니다.
pub struct MemoryExecutor {
    store: MemoryStore,
    /// 저장소에서 몇 번째로 열린 연결인지 (1부터)
    id: usize,
    current_schema: Option<String>,
}

impl MemoryExecutor {
    fn apply(&mut self, state: &mut StoreState, stmt: &Ddl) -> Result<(), sqlx::Error> {
        match stmt {
            Ddl::CreateSchema(name) => {
                state.schemas.entry(name.clone()).or_default();
            }
            Ddl::Use(name) => {
                if !state.schemas.contains_key(name) {
                    return Err(sqlx::Error::Protocol(format!("Unknown database '{}'", name)));
                }
                self.current_schema = Some(name.clone());
            }
            Ddl::CreateTable { name, spec } => {
                let tables = Self::selected(state, &self.current_schema)?;
                tables.entry(name.clone()).or_insert_with(|| MemoryTable {
                    spec: spec.clone(),
                    rows: 0,
                });
            }
            Ddl::ReplaceTable { name, spec } => {
                let tables = Self::selected(state, &self.current_schema)?;
                tables.insert(
                    name.clone(),
                    MemoryTable {
                        spec: spec.clone(),
                        rows: 0,
                    },
                );
            }
            Ddl::DeleteAll(name) => {
                let tables = Self::selected(state, &self.current_schema)?;
                match tables.get_mut(name) {
                    Some(t) => t.rows = 0,
                    None => {
                        return Err(sqlx::Error::Protocol(format!("Table '{}' doesn't exist", name)));
                    }
                }
            }
        }
        Ok(())
    }

    fn selected<'a>(
        state: &'a mut StoreState,
        current: &Option<String>,
    ) -> Result<&'a mut BTreeMap<String, MemoryTable>, sqlx::Error> {
        current
            .as_ref()
            .and_then(|schema| state.schemas.get_mut(schema))
            .ok_or_else(|| sqlx::Error::Protocol("No database selected".to_string()))
    }
}

#[async_trait]
impl SqlExecutor for MemoryExecutor {
    async fn execute(&mut self, stmt: &Ddl) -> Result<(), sqlx::Error> {
        let store = self.store.clone();
        let mut state = store.state.lock();
        state.log.push(stmt.to_string());

        if state.unreachable {
            return Err(unreachable_error());
        }
        if state.fail_on.as_deref() == Some(stmt.target()) {
            return Err(sqlx::Error::Protocol(format!(
                "injected failure on {}",
                stmt.target()
            )));
        }
        if let Ddl::DeleteAll(name) = stmt {
            if state.fail_delete_on.as_deref() == Some(name.as_str()) {
                return Err(sqlx::Error::Protocol(format!("injected delete failure on {}", name)));
            }
        }

        self.apply(&mut state, stmt)
    }

    async fn ping(&mut self) -> Result<(), sqlx::Error> {
        let state = self.store.state.lock();
        if state.unreachable {
            return Err(unreachable_error());
        }
        if state.fail_ping_after.is_some_and(|n| self.id > n) {
            return Err(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                "injected ping timeout",
            )));
        }
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

impl Drop for MemoryExecutor {
    fn drop(&mut self) {
        let mut state = self.store.state.lock();
        state.open_connections = state.open_connections.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> ConnectTarget {
        ConnectTarget {
            username: "root".into(),
            password: String::new(),
            addr: "127.0.0.1:3306".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_table_requires_selected_schema() {
        let store = MemoryStore::new();
        let mut conn = store.connector().connect(&target()).await.unwrap();

        let create = Ddl::CreateTable { name: "btc".into(), spec: "a INT".into() };
        assert!(conn.execute(&create).await.is_err());

        conn.execute(&Ddl::CreateSchema("balances".into())).await.unwrap();
        conn.execute(&Ddl::Use("balances".into())).await.unwrap();
        conn.execute(&create).await.unwrap();
        assert!(store.has_table("balances", "btc"));
    }

    #[tokio::test]
    async fn test_replace_table_empties_rows() {
        let store = MemoryStore::new();
        let mut conn = store.connector().connect(&target()).await.unwrap();
        conn.execute(&Ddl::CreateSchema("s".into())).await.unwrap();
        conn.execute(&Ddl::Use("s".into())).await.unwrap();
        conn.execute(&Ddl::CreateTable { name: "t".into(), spec: "a INT".into() })
            .await
            .unwrap();
        assert!(store.insert_rows("s", "t", 3));

        // IF NOT EXISTS는 데이터 유지
        conn.execute(&Ddl::CreateTable { name: "t".into(), spec: "a INT".into() })
            .await
            .unwrap();
        assert_eq!(store.row_count("s", "t"), Some(3));

        conn.execute(&Ddl::ReplaceTable { name: "t".into(), spec: "a INT".into() })
            .await
            .unwrap();
        assert_eq!(store.row_count("s", "t"), Some(0));
    }

    #[tokio::test]
    async fn test_connection_count_tracks_drop() {
        let store = MemoryStore::new();
        let conn = store.connector().connect(&target()).await.unwrap();
        assert_eq!(store.open_connections(), 1);
        conn.close().await.unwrap();
        assert_eq!(store.open_connections(), 0);
        assert_eq!(store.total_connections(), 1);
    }

    #[tokio::test]
    async fn test_ping_fails_only_on_later_connections() {
        let store = MemoryStore::new();
        store.fail_ping_after(Some(1));
        let mut first = store.connector().connect(&target()).await.unwrap();
        let mut second = store.connector().connect(&target()).await.unwrap();
        assert!(first.ping().await.is_ok());
        assert!(second.ping().await.is_err());

        store.fail_ping_after(None);
        assert!(second.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_failure_leaves_other_statements_alone() {
        let store = MemoryStore::new();
        store.fail_delete_on(Some("t"));
        let mut conn = store.connector().connect(&target()).await.unwrap();
        conn.execute(&Ddl::CreateSchema("s".into())).await.unwrap();
        conn.execute(&Ddl::Use("s".into())).await.unwrap();
        conn.execute(&Ddl::ReplaceTable { name: "t".into(), spec: "a INT".into() })
            .await
            .unwrap();
        assert!(conn.execute(&Ddl::DeleteAll("t".into())).await.is_err());
        assert!(store.has_table("s", "t"));
    }

    #[tokio::test]
    async fn test_unreachable_store_refuses_connections() {
        let store = MemoryStore::new();
        store.set_unreachable(true);
        assert!(store.connector().connect(&target()).await.is_err());
        assert_eq!(store.open_connections(), 0);
    }
}
