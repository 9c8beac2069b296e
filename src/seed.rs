use sea_orm::Set;
use time::macros::date;
use tracing::{info, warn};

use crate::{
    changeset::ChangeSet,
    entities::{actor, movie, rating, role},
    error::AppResult,
    library::Library,
};

/// Populates an empty catalog with a small sample so the demo has something
/// to list. Parents are committed first and looked back up by name so the
/// child rows can reference real foreign keys.
pub async fn seed_if_empty(library: &Library) -> AppResult<()> {
    if library.count_movies().await? > 0 {
        return Ok(());
    }
    info!("catalog is empty, seeding sample data");

    let mut changes = ChangeSet::new();
    for description in ["G", "PG", "PG-13", "R", "NC-17"] {
        changes.insert_rating(rating::ActiveModel {
            id: Default::default(),
            description: Set(description.to_string()),
        });
    }
    for (full_name, birthday) in [
        ("Cary Elwes", date!(1962 - 10 - 26)),
        ("Robin Wright", date!(1966 - 04 - 08)),
        ("Gene Wilder", date!(1933 - 06 - 11)),
        ("Madeline Kahn", date!(1942 - 09 - 29)),
    ] {
        changes.insert_actor(actor::ActiveModel {
            id: Default::default(),
            full_name: Set(full_name.to_string()),
            birthday: Set(birthday),
        });
    }
    changes.commit(library.db()).await?;

    let pg = library.find_rating_by_description("PG").await?.map(|r| r.id);

    let mut changes = ChangeSet::new();
    for (title, director, year, genre, rating_id) in [
        ("The Princess Bride", "Rob Reiner", 1987, "Adventure", pg),
        ("Young Frankenstein", "Mel Brooks", 1974, "Comedy", pg),
        // no rating on purpose, the listing has an unrated branch
        ("Primer", "Shane Carruth", 2004, "Science Fiction", None),
    ] {
        changes.insert_movie(movie::ActiveModel {
            id: Default::default(),
            title: Set(title.to_string()),
            primary_director: Set(director.to_string()),
            year_released: Set(year),
            genre: Set(genre.to_string()),
            rating_id: Set(rating_id),
        });
    }
    changes.commit(library.db()).await?;

    let mut changes = ChangeSet::new();
    for (title, character, actor_name) in [
        ("The Princess Bride", "Westley", "Cary Elwes"),
        ("The Princess Bride", "Buttercup", "Robin Wright"),
        ("Young Frankenstein", "Dr. Frederick Frankenstein", "Gene Wilder"),
        ("Young Frankenstein", "Elizabeth", "Madeline Kahn"),
    ] {
        let Some(movie) = library.find_movie_by_title(title).await? else {
            warn!(title, "seeded movie missing, skipping role");
            continue;
        };
        let Some(actor) = library.find_actor_by_name(actor_name).await? else {
            warn!(actor_name, "seeded actor missing, skipping role");
            continue;
        };
        changes.insert_role(role::ActiveModel {
            id: Default::default(),
            character_name: Set(character.to_string()),
            movie_id: Set(movie.id),
            actor_id: Set(actor.id),
        });
    }
    changes.commit(library.db()).await?;

    Ok(())
}
