use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Executor};

use super::executor::{ConnectTarget, Ddl, SqlExecutor, StoreConnector};

/// MySQL / MariaDB 연결 생성기
///
/// 풀 대신 단일 `MySqlConnection`을 엽니다. `USE`와 그 뒤의 CREATE가
/// 같은 세션에서 실행되어야 하기 때문입니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

impl MySqlConnector {
    /// 스키마(데이터베이스)를 지정하지 않은 접속 옵션
    pub fn connect_options(target: &ConnectTarget) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&target.addr.ip().to_string())
            .port(target.addr.port())
            .username(&target.username)
            .password(&target.password)
    }
}

#[async_trait]
impl StoreConnector for MySqlConnector {
    async fn connect(&self, target: &ConnectTarget) -> Result<Box<dyn SqlExecutor>, sqlx::Error> {
        let conn = MySqlConnection::connect_with(&Self::connect_options(target)).await?;
        Ok(Box::new(MySqlExecutor { conn }))
    }
}

pub struct MySqlExecutor {
    conn: MySqlConnection,
}

#[async_trait]
impl SqlExecutor for MySqlExecutor {
    async fn execute(&mut self, stmt: &Ddl) -> Result<(), sqlx::Error> {
        // 인자 없는 &str은 text protocol로 전송됨 (USE는 prepared statement 불가)
        let sql = stmt.to_string();
        self.conn.execute(sql.as_str()).await?;
        Ok(())
    }

    async fn ping(&mut self) -> Result<(), sqlx::Error> {
        self.conn.ping().await
    }

    async fn close(self: Box<Self>) -> Result<(), sqlx::Error> {
        self.conn.close().await
    }
}
