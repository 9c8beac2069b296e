use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ratings::Table)
                    .if_not_exists()
                    .col(pk_auto(Ratings::Id))
                    .col(string(Ratings::Description))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(pk_auto(Actors::Id))
                    .col(string(Actors::FullName))
                    .col(date(Actors::Birthday))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string(Movies::Title))
                    .col(string(Movies::PrimaryDirector))
                    .col(integer(Movies::YearReleased))
                    .col(string(Movies::Genre))
                    .col(integer_null(Movies::RatingId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_rating_id")
                            .from(Movies::Table, Movies::RatingId)
                            .to(Ratings::Table, Ratings::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(pk_auto(Roles::Id))
                    .col(string(Roles::CharacterName))
                    .col(integer(Roles::MovieId))
                    .col(integer(Roles::ActorId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roles_movie_id")
                            .from(Roles::Table, Roles::MovieId)
                            .to(Movies::Table, Movies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roles_actor_id")
                            .from(Roles::Table, Roles::ActorId)
                            .to(Actors::Table, Actors::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_roles_movie_id")
                    .table(Roles::Table)
                    .col(Roles::MovieId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_roles_actor_id")
                    .table(Roles::Table)
                    .col(Roles::ActorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Roles::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Ratings::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    PrimaryDirector,
    YearReleased,
    Genre,
    RatingId,
}

#[derive(DeriveIden)]
enum Ratings {
    Table,
    Id,
    Description,
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    Id,
    FullName,
    Birthday,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    CharacterName,
    MovieId,
    ActorId,
}
