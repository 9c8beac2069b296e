use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use tracing::warn;

use crate::{
    entities::{actor, movie, rating, role},
    error::AppResult,
    models::{CastMember, MovieWithCast},
};

/// Read side of the catalog: lookups never fail on a miss, they return `None`.
#[derive(Clone)]
pub struct Library {
    db: DatabaseConnection,
}

impl Library {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn count_movies(&self) -> AppResult<u64> {
        Ok(movie::Entity::find().count(&self.db).await?)
    }

    pub async fn list_movies(&self) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find().order_by_asc(movie::Column::Id).all(&self.db).await?)
    }

    pub async fn find_movie_by_title(&self, title: &str) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find().filter(movie::Column::Title.eq(title)).one(&self.db).await?)
    }

    pub async fn find_rating_by_description(
        &self,
        description: &str,
    ) -> AppResult<Option<rating::Model>> {
        Ok(rating::Entity::find()
            .filter(rating::Column::Description.eq(description))
            .one(&self.db)
            .await?)
    }

    pub async fn find_actor_by_name(&self, full_name: &str) -> AppResult<Option<actor::Model>> {
        Ok(actor::Entity::find()
            .filter(actor::Column::FullName.eq(full_name))
            .one(&self.db)
            .await?)
    }

    /// Every movie together with its rating and cast, fetched with batched
    /// queries rather than one round-trip per row.
    pub async fn movies_with_cast(&self) -> AppResult<Vec<MovieWithCast>> {
        let pairs = movie::Entity::find()
            .find_also_related(rating::Entity)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;

        let movies: Vec<movie::Model> = pairs.iter().map(|(movie, _)| movie.clone()).collect();
        let roles_per_movie = movies.load_many(role::Entity, &self.db).await?;

        let all_roles: Vec<role::Model> = roles_per_movie.iter().flatten().cloned().collect();
        let mut actors = all_roles.load_one(actor::Entity, &self.db).await?.into_iter();

        let mut listing = Vec::with_capacity(pairs.len());
        for ((movie, rating), roles) in pairs.into_iter().zip(roles_per_movie) {
            let mut cast = Vec::with_capacity(roles.len());
            for role in roles {
                let Some(Some(actor)) = actors.next() else {
                    warn!(role_id = role.id, "role without a matching actor row, skipping");
                    continue;
                };
                cast.push(CastMember {
                    character_name: role.character_name,
                    actor_name: actor.full_name,
                });
            }
            listing.push(MovieWithCast {
                id: movie.id,
                title: movie.title,
                primary_director: movie.primary_director,
                year_released: movie.year_released,
                genre: movie.genre,
                rating: rating.map(|r| r.description),
                cast,
            });
        }

        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ActiveModelTrait, Set};
    use time::macros::date;

    use super::*;
    use crate::db;

    async fn setup() -> Library {
        Library::new(db::connect_in_memory().await)
    }

    async fn sample_catalog(library: &Library) {
        let pg = rating::ActiveModel {
            id: Default::default(),
            description: Set("PG".to_string()),
        }
        .insert(library.db())
        .await
        .unwrap();

        let elwes = actor::ActiveModel {
            id: Default::default(),
            full_name: Set("Cary Elwes".to_string()),
            birthday: Set(date!(1962 - 10 - 26)),
        }
        .insert(library.db())
        .await
        .unwrap();

        let wright = actor::ActiveModel {
            id: Default::default(),
            full_name: Set("Robin Wright".to_string()),
            birthday: Set(date!(1966 - 04 - 08)),
        }
        .insert(library.db())
        .await
        .unwrap();

        let bride = movie::ActiveModel {
            id: Default::default(),
            title: Set("The Princess Bride".to_string()),
            primary_director: Set("Rob Reiner".to_string()),
            year_released: Set(1987),
            genre: Set("Adventure".to_string()),
            rating_id: Set(Some(pg.id)),
        }
        .insert(library.db())
        .await
        .unwrap();

        movie::ActiveModel {
            id: Default::default(),
            title: Set("Primer".to_string()),
            primary_director: Set("Shane Carruth".to_string()),
            year_released: Set(2004),
            genre: Set("Science Fiction".to_string()),
            rating_id: Set(None),
        }
        .insert(library.db())
        .await
        .unwrap();

        for (character, actor_id) in [("Westley", elwes.id), ("Buttercup", wright.id)] {
            role::ActiveModel {
                id: Default::default(),
                character_name: Set(character.to_string()),
                movie_id: Set(bride.id),
                actor_id: Set(actor_id),
            }
            .insert(library.db())
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn lookup_miss_returns_none() {
        let library = setup().await;
        assert!(library.find_movie_by_title("No Such Film").await.unwrap().is_none());
        assert!(library.find_rating_by_description("X").await.unwrap().is_none());
        assert!(library.find_actor_by_name("Nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn counts_and_lists_all_movies() {
        let library = setup().await;
        sample_catalog(&library).await;

        assert_eq!(library.count_movies().await.unwrap(), 2);
        let titles: Vec<String> =
            library.list_movies().await.unwrap().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["The Princess Bride", "Primer"]);
    }

    #[tokio::test]
    async fn unrated_movie_takes_the_none_branch() {
        let library = setup().await;
        sample_catalog(&library).await;

        let listing = library.movies_with_cast().await.unwrap();

        let primer = listing.iter().find(|m| m.title == "Primer").unwrap();
        assert_eq!(primer.rating, None);
        assert!(primer.cast.is_empty());

        let bride = listing.iter().find(|m| m.title == "The Princess Bride").unwrap();
        assert_eq!(bride.rating.as_deref(), Some("PG"));
        assert_eq!(bride.cast.len(), 2);
    }

    #[tokio::test]
    async fn eager_loading_matches_in_memory_join() {
        let library = setup().await;
        sample_catalog(&library).await;

        let eager = library.movies_with_cast().await.unwrap();

        let movies = library.list_movies().await.unwrap();
        let roles = role::Entity::find().all(library.db()).await.unwrap();
        let actors = actor::Entity::find().all(library.db()).await.unwrap();

        assert_eq!(eager.len(), movies.len());
        for movie in movies {
            let mut expected: Vec<CastMember> = roles
                .iter()
                .filter(|r| r.movie_id == movie.id)
                .map(|r| CastMember {
                    character_name: r.character_name.clone(),
                    actor_name: actors
                        .iter()
                        .find(|a| a.id == r.actor_id)
                        .unwrap()
                        .full_name
                        .clone(),
                })
                .collect();
            expected.sort();

            let entry = eager.iter().find(|m| m.id == movie.id).unwrap();
            let mut actual = entry.cast.clone();
            actual.sort();

            assert_eq!(actual, expected);
        }
    }
}
