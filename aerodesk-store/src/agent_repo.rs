use aerodesk_core::{AgentRepository, RepositoryError};
use aerodesk_order::Agent;
use aerodesk_shared::Masked;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const AGENT_COLUMNS: &str = "id, name, email, phone, agency_name, total_commission, active, date_joined";

pub struct PostgresAgentRepository {
    pool: PgPool,
}

impl PostgresAgentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, sql: &str, id: Uuid, amount: i64) -> Result<Option<Agent>, RepositoryError> {
        let row = sqlx::query_as::<_, AgentRow>(sql)
            .bind(id)
            .bind(amount)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Agent::from))
    }
}

#[derive(sqlx::FromRow)]
struct AgentRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    agency_name: String,
    total_commission: i64,
    active: bool,
    date_joined: DateTime<Utc>,
}

impl From<AgentRow> for Agent {
    fn from(row: AgentRow) -> Self {
        Agent {
            id: row.id,
            name: row.name,
            email: Masked::new(row.email),
            phone: Masked::new(row.phone),
            agency_name: row.agency_name,
            total_commission: row.total_commission,
            active: row.active,
            date_joined: row.date_joined,
        }
    }
}

#[async_trait]
impl AgentRepository for PostgresAgentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, RepositoryError> {
        let row = sqlx::query_as::<_, AgentRow>(&format!("SELECT {AGENT_COLUMNS} FROM agents WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Agent::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Agent>, RepositoryError> {
        let row = sqlx::query_as::<_, AgentRow>(&format!("SELECT {AGENT_COLUMNS} FROM agents WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Agent::from))
    }

    async fn insert(&self, agent: &Agent) -> Result<(), RepositoryError> {
        sqlx::query(&format!(
            "INSERT INTO agents ({AGENT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        ))
        .bind(agent.id)
        .bind(&agent.name)
        .bind(agent.email.expose())
        .bind(agent.phone.expose())
        .bind(&agent.agency_name)
        .bind(agent.total_commission)
        .bind(agent.active)
        .bind(agent.date_joined)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, agent: &Agent) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE agents
             SET name = $2, email = $3, phone = $4, agency_name = $5, total_commission = $6, active = $7
             WHERE id = $1",
        )
        .bind(agent.id)
        .bind(&agent.name)
        .bind(agent.email.expose())
        .bind(agent.phone.expose())
        .bind(&agent.agency_name)
        .bind(agent.total_commission)
        .bind(agent.active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(format!("agent {} does not exist", agent.id).into());
        }
        Ok(())
    }

    async fn credit_commission(&self, id: Uuid, amount: i64) -> Result<Option<Agent>, RepositoryError> {
        self.fetch_one_where(
            &format!(
                "UPDATE agents SET total_commission = total_commission + $2
                 WHERE id = $1
                 RETURNING {AGENT_COLUMNS}"
            ),
            id,
            amount,
        )
        .await
    }

    async fn debit_commission(&self, id: Uuid, amount: i64) -> Result<Option<Agent>, RepositoryError> {
        self.fetch_one_where(
            &format!(
                "UPDATE agents SET total_commission = total_commission - $2
                 WHERE id = $1 AND total_commission >= $2
                 RETURNING {AGENT_COLUMNS}"
            ),
            id,
            amount,
        )
        .await
    }
}
