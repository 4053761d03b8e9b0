// =====================================================
// Table Provisioning - 테이블 그룹 생성기
// =====================================================
// 테이블 그룹 = (스키마, 컬럼 spec, 생성 전략)
//
// 전략:
// 1. Singleton          - 스키마에 테이블 하나 (피어, 경매 퍼즐)
// 2. PerCoin            - 코인마다 테이블 하나, 기존 데이터 유지 (잔고, 입금)
// 3. PerCoinDestructive - 코인마다 CREATE OR REPLACE 후 DELETE (대기 중 입금 전용)
// 4. PerPair            - 거래쌍마다 테이블 하나 (오더북, 경매 오더북)
//
// 실행 순서: statements()로 DDL 목록을 만든 뒤 순서대로 실행
// 하나라도 실패하면 즉시 중단 (이미 만든 테이블은 롤백하지 않음)
// =====================================================

use crate::domains::exchange::models::{Coin, Pair};
use crate::shared::errors::DbError;

use super::executor::{Ddl, SqlExecutor};

/// 테이블 생성 전략
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStrategy {
    /// 이름이 정해진 단일 테이블
    Singleton(String),
    /// 코인별 테이블 (IF NOT EXISTS)
    PerCoin,
    /// 코인별 테이블 (drop-and-recreate 후 비우기)
    ///
    /// 대기 중 입금 테이블에만 사용. 잔고/입금 데이터에 쓰면 안 됨.
    PerCoinDestructive,
    /// 거래쌍별 테이블 (IF NOT EXISTS)
    PerPair,
}

/// 한 번에 생성하는 테이블 묶음
#[derive(Debug, Clone)]
pub struct TableGroup<'a> {
    pub schema: &'a str,
    pub spec: &'a str,
    pub strategy: TableStrategy,
}

impl<'a> TableGroup<'a> {
    pub fn new(schema: &'a str, spec: &'a str, strategy: TableStrategy) -> Self {
        Self { schema, spec, strategy }
    }

    /// 실행할 DDL 목록 (항상 USE <schema>로 시작)
    pub fn statements(&self, coins: &[Coin], pairs: &[Pair]) -> Vec<Ddl> {
        let mut stmts = vec![Ddl::Use(self.schema.to_string())];

        match &self.strategy {
            TableStrategy::Singleton(name) => stmts.push(self.create(name.clone())),
            TableStrategy::PerCoin => {
                stmts.extend(coins.iter().map(|coin| self.create(coin.name.clone())));
            }
            TableStrategy::PerCoinDestructive => {
                for coin in coins {
                    stmts.push(Ddl::ReplaceTable {
                        name: coin.name.clone(),
                        spec: self.spec.to_string(),
                    });
                    stmts.push(Ddl::DeleteAll(coin.name.clone()));
                }
            }
            TableStrategy::PerPair => {
                stmts.extend(pairs.iter().map(|pair| self.create(pair.to_string())));
            }
        }

        stmts
    }

    fn create(&self, name: String) -> Ddl {
        Ddl::CreateTable {
            name,
            spec: self.spec.to_string(),
        }
    }
}

/// 테이블 그룹 생성
///
/// # Returns
/// 생성(또는 재생성)한 테이블 수
///
/// # Errors
/// * `SchemaSelection` - USE 실패
/// * `TableCreation` - CREATE 실패 (테이블 이름 포함)
/// * `TableReset` - 재생성 후 DELETE 실패
pub async fn provision(
    executor: &mut dyn SqlExecutor,
    group: &TableGroup<'_>,
    coins: &[Coin],
    pairs: &[Pair],
) -> Result<usize, DbError> {
    let mut tables = 0;

    for stmt in group.statements(coins, pairs) {
        executor
            .execute(&stmt)
            .await
            .map_err(|source| wrap_error(&stmt, source))?;

        if matches!(stmt, Ddl::CreateTable { .. } | Ddl::ReplaceTable { .. }) {
            tables += 1;
        }
    }

    tracing::debug!(
        schema = group.schema,
        strategy = ?group.strategy,
        tables,
        "table group provisioned"
    );
    Ok(tables)
}

/// CREATE SCHEMA IF NOT EXISTS
pub async fn create_schema(executor: &mut dyn SqlExecutor, schema: &str) -> Result<(), DbError> {
    let stmt = Ddl::CreateSchema(schema.to_string());
    executor
        .execute(&stmt)
        .await
        .map_err(|source| wrap_error(&stmt, source))
}

fn wrap_error(stmt: &Ddl, source: sqlx::Error) -> DbError {
    match stmt {
        Ddl::CreateSchema(schema) => DbError::SchemaCreation {
            schema: schema.clone(),
            source,
        },
        Ddl::Use(schema) => DbError::SchemaSelection {
            schema: schema.clone(),
            source,
        },
        Ddl::CreateTable { name, .. } | Ddl::ReplaceTable { name, .. } => DbError::TableCreation {
            table: name.clone(),
            source,
        },
        Ddl::DeleteAll(name) => DbError::TableReset {
            table: name.clone(),
            source,
        },
    }
}
