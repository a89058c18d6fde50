use super::{ModelInstance, ModelLookup};
use crate::error::{BindError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use sea_orm::sea_query::ColumnType;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Value};
use std::any::type_name;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

type FinderFuture = Pin<Box<dyn Future<Output = Result<ModelInstance>> + Send>>;
type Finder = Arc<dyn Fn(DatabaseConnection, String, String) -> FinderFuture + Send + Sync>;

/// [`ModelLookup`] backed by a SeaORM connection.
///
/// Each entity is registered once; its `Model` type becomes resolvable and
/// lookups run `SELECT ... WHERE <column> = <value> LIMIT 1`.
///
/// # Example
/// ```rust,ignore
/// let lookup = SeaOrmLookup::new(db.clone());
/// lookup.register::<user::Entity>().register::<post::Entity>();
/// let binder = Binder::new(Arc::new(lookup));
/// ```
pub struct SeaOrmLookup {
    db: DatabaseConnection,
    finders: DashMap<&'static str, Finder>,
}

impl SeaOrmLookup {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            finders: DashMap::new(),
        }
    }

    pub fn register<E>(&self) -> &Self
    where
        E: EntityTrait + 'static,
        E::Model: Sync + 'static,
    {
        let finder: Finder = Arc::new(
            |db: DatabaseConnection, column: String, value: String| -> FinderFuture {
                Box::pin(async move { find_where::<E>(&db, &column, &value).await })
            },
        );
        self.finders.insert(type_name::<E::Model>(), finder);
        self
    }
}

async fn find_where<E>(db: &DatabaseConnection, column: &str, value: &str) -> Result<ModelInstance>
where
    E: EntityTrait + 'static,
    E::Model: Sync + 'static,
{
    let model = type_name::<E::Model>();
    let col = E::Column::from_str(column).map_err(|_| BindError::UnknownColumn {
        model: model.to_string(),
        column: column.to_string(),
    })?;

    // A value that cannot be read as the column's type can never match.
    let param =
        column_value(&col, value).ok_or_else(|| BindError::not_found(model, column, value))?;

    E::find()
        .filter(col.eq(param))
        .one(db)
        .await?
        .map(|found| Arc::new(found) as ModelInstance)
        .ok_or_else(|| BindError::not_found(model, column, value))
}

fn column_value<C: ColumnTrait>(col: &C, raw: &str) -> Option<Value> {
    match col.def().get_column_type() {
        ColumnType::TinyInteger
        | ColumnType::SmallInteger
        | ColumnType::Integer
        | ColumnType::BigInteger => raw.parse::<i64>().ok().map(Value::from),
        ColumnType::TinyUnsigned
        | ColumnType::SmallUnsigned
        | ColumnType::Unsigned
        | ColumnType::BigUnsigned => raw.parse::<u64>().ok().map(Value::from),
        ColumnType::Boolean => raw.parse::<bool>().ok().map(Value::from),
        ColumnType::Uuid => uuid::Uuid::parse_str(raw).ok().map(Value::from),
        _ => Some(Value::from(raw.to_owned())),
    }
}

#[async_trait]
impl ModelLookup for SeaOrmLookup {
    fn resolves(&self, model: &str) -> bool {
        self.finders.contains_key(model)
    }

    async fn find_one_where(
        &self,
        model: &str,
        column: &str,
        value: &str,
    ) -> Result<ModelInstance> {
        let finder = self
            .finders
            .get(model)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| BindError::not_found(model, column, value))?;
        finder(self.db.clone(), column.to_string(), value.to_string()).await
    }
}
