//! Unit of work: staged inserts, updates, and removals applied to the store
//! in a single transaction by `commit`.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, TransactionTrait,
};
use tracing::debug;

use crate::{
    entities::{actor, movie, rating, role},
    error::AppResult,
};

enum Op<A> {
    Insert(A),
    Update(A),
    Delete(A),
}

enum Change {
    Movie(Op<movie::ActiveModel>),
    Rating(Op<rating::ActiveModel>),
    Actor(Op<actor::ActiveModel>),
    Role(Op<role::ActiveModel>),
}

/// Pending changes never touch the store until `commit`. Mutations are staged
/// explicitly: convert a fetched `Model` into an `ActiveModel`, `Set` the
/// fields that changed, and stage it here.
#[derive(Default)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn insert_movie(&mut self, movie: movie::ActiveModel) {
        self.changes.push(Change::Movie(Op::Insert(movie)));
    }

    pub fn update_movie(&mut self, movie: movie::ActiveModel) {
        self.changes.push(Change::Movie(Op::Update(movie)));
    }

    pub fn remove_movie(&mut self, movie: movie::Model) {
        self.changes.push(Change::Movie(Op::Delete(movie.into_active_model())));
    }

    pub fn insert_rating(&mut self, rating: rating::ActiveModel) {
        self.changes.push(Change::Rating(Op::Insert(rating)));
    }

    pub fn insert_actor(&mut self, actor: actor::ActiveModel) {
        self.changes.push(Change::Actor(Op::Insert(actor)));
    }

    pub fn insert_role(&mut self, role: role::ActiveModel) {
        self.changes.push(Change::Role(Op::Insert(role)));
    }

    /// Applies every staged change in staging order inside one transaction.
    /// Any failure aborts the whole set; nothing is applied.
    pub async fn commit(self, db: &DatabaseConnection) -> AppResult<()> {
        if self.changes.is_empty() {
            return Ok(());
        }
        debug!(changes = self.len(), "committing change set");

        let txn = db.begin().await?;
        for change in self.changes {
            match change {
                Change::Movie(op) => apply(op, &txn).await?,
                Change::Rating(op) => apply(op, &txn).await?,
                Change::Actor(op) => apply(op, &txn).await?,
                Change::Role(op) => apply(op, &txn).await?,
            }
        }
        txn.commit().await?;

        Ok(())
    }
}

async fn apply<A>(op: Op<A>, txn: &DatabaseTransaction) -> Result<(), sea_orm::DbErr>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    match op {
        Op::Insert(model) => {
            model.insert(txn).await?;
        }
        Op::Update(model) => {
            model.update(txn).await?;
        }
        Op::Delete(model) => {
            model.delete(txn).await?;
        }
    }
    Ok(())
}
