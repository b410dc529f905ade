//! SeaORM-backed durable store (Postgres in production, SQLite in tests).

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, Schema, Set,
};
use tracing::{error, info};

use super::DurableStore;
use crate::domain::deck::validate_catalog;
use crate::domain::house::UserGroup;
use crate::domain::{catalog, Card, HouseState, Suit};
use crate::entities::houses::PermissionGroup;
use crate::entities::{cards, houses};
use crate::errors::domain::{DomainError, InfraErrorKind};

pub struct SeaDurable {
    conn: DatabaseConnection,
}

fn db_error(op: &str, err: DbErr) -> DomainError {
    error!(op, error = %err, "durable store operation failed");
    DomainError::infra(InfraErrorKind::Store, format!("durable store {op} failed"))
}

fn suit_name(suit: Suit) -> &'static str {
    match suit {
        Suit::Clubs => "CLUBS",
        Suit::Spades => "SPADES",
        Suit::Hearts => "HEARTS",
        Suit::Diamonds => "DIAMONDS",
    }
}

fn permission(group: UserGroup) -> PermissionGroup {
    match group {
        UserGroup::Anyone => PermissionGroup::Anyone,
        UserGroup::Friends => PermissionGroup::Friends,
        UserGroup::Nobody => PermissionGroup::Nobody,
    }
}

fn card_row(card: Card) -> cards::ActiveModel {
    cards::ActiveModel {
        code: Set(card.code()),
        suit: Set(suit_name(card.suit).to_string()),
        power: Set(i16::from(card.power())),
        points: Set(i16::from(card.points())),
    }
}

impl SeaDurable {
    /// Connect and make sure the schema and the catalog rows exist.
    pub async fn connect(database_url: &str) -> Result<Self, DbErr> {
        let mut opts = ConnectOptions::new(database_url.to_owned());
        opts.sqlx_logging(false);
        if database_url.starts_with("sqlite:") {
            // each in-memory SQLite connection is its own database
            opts.max_connections(1);
        }
        let conn = Database::connect(opts).await?;
        let store = Self { conn };
        store.bootstrap().await?;
        Ok(store)
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    async fn bootstrap(&self) -> Result<(), DbErr> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);
        let mut houses_table = schema.create_table_from_entity(houses::Entity);
        houses_table.if_not_exists();
        self.conn.execute(backend.build(&houses_table)).await?;
        let mut cards_table = schema.create_table_from_entity(cards::Entity);
        cards_table.if_not_exists();
        self.conn.execute(backend.build(&cards_table)).await?;

        if cards::Entity::find().count(&self.conn).await? == 0 {
            cards::Entity::insert_many(catalog().into_iter().map(card_row))
                .exec_without_returning(&self.conn)
                .await?;
            info!("seeded card catalog");
        }
        Ok(())
    }
}

#[async_trait]
impl DurableStore for SeaDurable {
    async fn record_house(&self, house: &HouseState) -> Result<(), DomainError> {
        let config = &house.config;
        let player_count = i16::try_from(config.player_count).map_err(|_| {
            DomainError::invariant(format!("player count {} out of range", config.player_count))
        })?;
        let row = houses::ActiveModel {
            id: Set(house.id),
            host_id: Set(house.host_id),
            variant: Set(config.variant.as_str().to_string()),
            player_count: Set(player_count),
            nopick_legal: Set(config.nopick_legal),
            automatic_double: Set(config.automatic_double),
            blitz_legal: Set(config.blitz_legal),
            crack_legal: Set(config.crack_legal),
            chat_enabled: Set(config.chat_enabled),
            players_permitted: Set(permission(config.players_permitted)),
            spectators_permitted: Set(permission(config.spectators_permitted)),
            created_at: Set(time::OffsetDateTime::now_utc()),
        };
        row.insert(&self.conn)
            .await
            .map_err(|e| db_error("record_house", e))?;
        Ok(())
    }

    async fn load_catalog(&self) -> Result<Vec<Card>, DomainError> {
        let rows = cards::Entity::find()
            .all(&self.conn)
            .await
            .map_err(|e| db_error("load_catalog", e))?;

        let mut loaded = Vec::with_capacity(rows.len());
        for row in rows {
            let card: Card = row.code.parse().map_err(|_| {
                DomainError::invariant(format!("catalog row has bad code {:?}", row.code))
            })?;
            if row.suit != suit_name(card.suit)
                || row.power != i16::from(card.power())
                || row.points != i16::from(card.points())
            {
                return Err(DomainError::invariant(format!(
                    "catalog row for {} disagrees with the rules",
                    row.code
                )));
            }
            loaded.push(card);
        }
        validate_catalog(&loaded)?;
        Ok(loaded)
    }
}
