// fixtures/movies.rs - The movies dataset
//
// Six steps: the schema, then movies, directors, genres and keywords,
// actors, and finally user ratings. Snapshot `06` is the complete dataset
// the exercise suites query.
//
// Budgets use quarter/half fractions so sums stay exact in floating point.

use super::{Dataset, Step};

pub struct MoviesDataset;

impl Dataset for MoviesDataset {
    const NAME: &'static str = "movies";

    fn steps() -> &'static [Step] {
        STEPS
    }
}

const STEPS: &[Step] = &[
    Step {
        label: "01",
        description: "schema",
        setup_sql: &[
            r#"
            CREATE TABLE movies (
                id INTEGER PRIMARY KEY,
                original_title TEXT NOT NULL,
                release_date TEXT NOT NULL,
                runtime INTEGER,
                budget_adjusted REAL,
                revenue_adjusted REAL
            )
            "#,
            r#"
            CREATE TABLE directors (
                id INTEGER PRIMARY KEY,
                full_name TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE movie_directors (
                movie_id INTEGER NOT NULL REFERENCES movies (id),
                director_id INTEGER NOT NULL REFERENCES directors (id),
                PRIMARY KEY (movie_id, director_id)
            )
            "#,
            r#"
            CREATE TABLE genres (
                id INTEGER PRIMARY KEY,
                genre TEXT NOT NULL UNIQUE
            )
            "#,
            r#"
            CREATE TABLE movie_genres (
                movie_id INTEGER NOT NULL REFERENCES movies (id),
                genre_id INTEGER NOT NULL REFERENCES genres (id),
                PRIMARY KEY (movie_id, genre_id)
            )
            "#,
            r#"
            CREATE TABLE keywords (
                id INTEGER PRIMARY KEY,
                keyword TEXT NOT NULL UNIQUE
            )
            "#,
            r#"
            CREATE TABLE movie_keywords (
                movie_id INTEGER NOT NULL REFERENCES movies (id),
                keyword_id INTEGER NOT NULL REFERENCES keywords (id),
                PRIMARY KEY (movie_id, keyword_id)
            )
            "#,
            r#"
            CREATE TABLE actors (
                id INTEGER PRIMARY KEY,
                full_name TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE movie_actors (
                movie_id INTEGER NOT NULL REFERENCES movies (id),
                actor_id INTEGER NOT NULL REFERENCES actors (id),
                PRIMARY KEY (movie_id, actor_id)
            )
            "#,
            r#"
            CREATE TABLE movie_ratings (
                user_id INTEGER NOT NULL,
                movie_id INTEGER NOT NULL REFERENCES movies (id),
                rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
                time_created TEXT NOT NULL,
                PRIMARY KEY (user_id, movie_id)
            )
            "#,
        ],
    },
    Step {
        label: "02",
        description: "movies",
        setup_sql: &[r#"
            INSERT INTO movies (id, original_title, release_date, runtime, budget_adjusted, revenue_adjusted)
            VALUES
                (1, 'Alien', '1979-05-25', 117, 42000000.25, 390000000.0),
                (2, 'Gladiator', '2000-05-01', 155, 103000000.5, 460000000.0),
                (3, 'The Martian', '2015-09-30', 144, 108000000.0, 630000000.0),
                (4, 'Transformers', '2007-06-27', 144, 150000000.75, 710000000.0),
                (5, 'Armageddon', '1998-07-01', 151, 140000000.0, 553000000.0),
                (6, 'Harry Potter and the Deathly Hallows: Part 2', '2011-07-07', 130, 125000000.0, 1342000000.0),
                (7, 'Fantastic Beasts and Where to Find Them', '2016-11-16', 133, 180000000.0, 814000000.0),
                (8, 'Life', '2017-03-23', 104, 58000000.0, 100000000.0),
                (9, 'Life', '1999-04-16', 108, 15000000.0, 73000000.0)
            "#],
    },
    Step {
        label: "03",
        description: "directors",
        setup_sql: &[
            r#"
            INSERT INTO directors (id, full_name)
            VALUES
                (1, 'Ridley Scott'),
                (2, 'Michael Bay'),
                (3, 'David Yates'),
                (4, 'Daniel Espinosa'),
                (5, 'Ted Demme')
            "#,
            r#"
            INSERT INTO movie_directors (movie_id, director_id)
            VALUES (1, 1), (2, 1), (3, 1), (4, 2), (5, 2), (6, 3), (7, 3), (8, 4), (9, 5)
            "#,
        ],
    },
    Step {
        label: "04",
        description: "genres and keywords",
        setup_sql: &[
            r#"
            INSERT INTO genres (id, genre)
            VALUES
                (1, 'Drama'),
                (2, 'Thriller'),
                (3, 'Crime'),
                (4, 'Science Fiction'),
                (5, 'Action'),
                (6, 'Fantasy'),
                (7, 'Comedy')
            "#,
            r#"
            INSERT INTO movie_genres (movie_id, genre_id)
            VALUES
                (1, 4), (1, 2),
                (2, 1), (2, 5),
                (3, 4), (3, 1),
                (4, 5), (4, 4),
                (5, 5), (5, 2),
                (6, 6),
                (7, 6),
                (8, 4), (8, 2),
                (9, 7), (9, 3), (9, 1)
            "#,
            r#"
            INSERT INTO keywords (id, keyword)
            VALUES
                (1, 'woman director'),
                (2, 'based on novel'),
                (3, 'space'),
                (4, 'alien'),
                (5, 'robot'),
                (6, 'magic')
            "#,
            r#"
            INSERT INTO movie_keywords (movie_id, keyword_id)
            VALUES
                (1, 3), (3, 3), (4, 3), (8, 3),
                (3, 2), (6, 2), (7, 2),
                (1, 4), (8, 4),
                (4, 5),
                (6, 6)
            "#,
        ],
    },
    Step {
        label: "05",
        description: "actors",
        setup_sql: &[
            r#"
            INSERT INTO actors (id, full_name)
            VALUES
                (1, 'Jake Gyllenhaal'),
                (2, 'Rebecca Ferguson'),
                (3, 'Ryan Reynolds'),
                (4, 'Hiroyuki Sanada'),
                (5, 'Eddie Murphy'),
                (6, 'Martin Lawrence'),
                (7, 'Sigourney Weaver'),
                (8, 'Russell Crowe'),
                (9, 'Matt Damon'),
                (10, 'Bruce Willis'),
                (11, 'Daniel Radcliffe'),
                (12, 'Eddie Redmayne'),
                (13, 'Shia LaBeouf')
            "#,
            r#"
            INSERT INTO movie_actors (movie_id, actor_id)
            VALUES
                (1, 7), (2, 8), (3, 9), (4, 13), (5, 10), (6, 11), (7, 12),
                (8, 1), (8, 2), (8, 3), (8, 4),
                (9, 4), (9, 5), (9, 6)
            "#,
        ],
    },
    Step {
        label: "06",
        description: "ratings",
        setup_sql: &[r#"
            INSERT INTO movie_ratings (user_id, movie_id, rating, time_created)
            VALUES
                (1, 1, 5, '2019-01-03 10:00:00'),
                (2, 1, 4, '2019-01-04 11:30:00'),
                (1, 2, 5, '2019-01-05 09:15:00'),
                (3, 2, 5, '2019-01-05 21:40:00'),
                (5, 2, 5, '2019-02-11 18:05:00'),
                (2, 3, 4, '2019-02-12 20:00:00'),
                (3, 3, 5, '2019-02-14 08:45:00'),
                (1, 4, 2, '2019-03-01 13:20:00'),
                (2, 5, 3, '2019-03-02 17:10:00'),
                (3, 6, 5, '2019-03-09 19:55:00'),
                (4, 6, 4, '2019-03-10 22:30:00'),
                (4, 7, 4, '2019-04-01 12:00:00'),
                (1, 8, 3, '2019-04-02 16:25:00'),
                (4, 8, 2, '2019-04-03 10:40:00'),
                (2, 9, 3, '2019-04-07 14:05:00')
            "#],
    },
];
