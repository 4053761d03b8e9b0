// =====================================================
// SqlExecutor / StoreConnector - 저장소 인터페이스
// =====================================================
// Database는 구체적인 드라이버 대신 이 trait들만 사용합니다.
//
// 구현체:
// - MySqlConnector / MySqlExecutor: 실제 MySQL/MariaDB 연결 (sqlx)
// - MemoryConnector / MemoryExecutor: 테스트/dry-run용 메모리 저장소
//
// DDL은 문자열 대신 `Ddl` enum으로 전달되고, Display가 MySQL 방언으로 렌더링합니다.
// =====================================================

use std::fmt;
use std::net::SocketAddr;

use async_trait::async_trait;

/// 이 모듈이 실행하는 DDL 문장
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ddl {
    /// CREATE SCHEMA IF NOT EXISTS <name>
    CreateSchema(String),
    /// USE <schema>
    Use(String),
    /// CREATE TABLE IF NOT EXISTS <name> (<spec>)
    CreateTable { name: String, spec: String },
    /// CREATE OR REPLACE TABLE <name> (<spec>)
    ReplaceTable { name: String, spec: String },
    /// DELETE FROM <name>
    DeleteAll(String),
}

impl Ddl {
    /// 문장이 대상으로 하는 스키마/테이블 이름
    pub fn target(&self) -> &str {
        match self {
            Ddl::CreateSchema(name) | Ddl::Use(name) | Ddl::DeleteAll(name) => name,
            Ddl::CreateTable { name, .. } | Ddl::ReplaceTable { name, .. } => name,
        }
    }
}

/// 백틱으로 식별자 감싸기 (숫자로만 된 경매 테이블 이름도 허용됨)
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

impl fmt::Display for Ddl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ddl::CreateSchema(name) => write!(f, "CREATE SCHEMA IF NOT EXISTS {};", quote_ident(name)),
            Ddl::Use(name) => write!(f, "USE {};", quote_ident(name)),
            Ddl::CreateTable { name, spec } => {
                write!(f, "CREATE TABLE IF NOT EXISTS {} ({});", quote_ident(name), spec)
            }
            Ddl::ReplaceTable { name, spec } => {
                write!(f, "CREATE OR REPLACE TABLE {} ({});", quote_ident(name), spec)
            }
            Ddl::DeleteAll(name) => write!(f, "DELETE FROM {};", quote_ident(name)),
        }
    }
}

/// 연결 대상: 사용자, 비밀번호, 해석된 주소
#[derive(Clone)]
pub struct ConnectTarget {
    pub username: String,
    pub password: String,
    pub addr: SocketAddr,
}

impl ConnectTarget {
    /// 주소 계열 (항상 TCP)
    pub fn network(&self) -> &'static str {
        "tcp"
    }
}

impl fmt::Debug for ConnectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectTarget")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("addr", &self.addr)
            .finish()
    }
}

/// 하나의 열린 연결 (세션)
///
/// `USE`로 선택한 스키마는 같은 세션의 다음 문장에 적용되므로
/// 구현체는 반드시 단일 세션이어야 합니다 (풀 X).
#[async_trait]
pub trait SqlExecutor: Send {
    async fn execute(&mut self, stmt: &Ddl) -> Result<(), sqlx::Error>;

    /// 연결 확인 (liveness probe)
    async fn ping(&mut self) -> Result<(), sqlx::Error>;

    /// 연결 종료
    async fn close(self: Box<Self>) -> Result<(), sqlx::Error>;
}

/// 연결을 여는 쪽
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// 스키마를 선택하지 않은 새 연결을 엽니다.
    async fn connect(&self, target: &ConnectTarget) -> Result<Box<dyn SqlExecutor>, sqlx::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ddl_rendering() {
        assert_eq!(
            Ddl::CreateSchema("balances".into()).to_string(),
            "CREATE SCHEMA IF NOT EXISTS `balances`;"
        );
        assert_eq!(Ddl::Use("orders".into()).to_string(), "USE `orders`;");
        assert_eq!(
            Ddl::CreateTable { name: "btc".into(), spec: "a INT".into() }.to_string(),
            "CREATE TABLE IF NOT EXISTS `btc` (a INT);"
        );
        assert_eq!(
            Ddl::ReplaceTable { name: "btc".into(), spec: "a INT".into() }.to_string(),
            "CREATE OR REPLACE TABLE `btc` (a INT);"
        );
        assert_eq!(Ddl::DeleteAll("btc".into()).to_string(), "DELETE FROM `btc`;");
    }

    #[test]
    fn test_quote_ident_escapes_backticks() {
        assert_eq!(quote_ident("a`b"), "`a``b`");
        assert_eq!(quote_ident("0000"), "`0000`");
    }

    #[test]
    fn test_connect_target_debug_redacts_password() {
        let target = ConnectTarget {
            username: "root".into(),
            password: "hunter2".into(),
            addr: "127.0.0.1:3306".parse().unwrap(),
        };
        let debug = format!("{:?}", target);
        assert!(!debug.contains("hunter2"));
        assert_eq!(target.network(), "tcp");
    }
}
