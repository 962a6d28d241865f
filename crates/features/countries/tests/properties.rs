use atlas_countries::{
    CountryError, CountryName, CountryRepository, MIGRATIONS, SurrealCountryRepository,
};
use atlas_database::Database;
use proptest::collection::btree_set;
use proptest::prelude::*;
use std::future::Future;

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
        .block_on(future)
}

async fn repository() -> SurrealCountryRepository {
    let db = Database::builder()
        .url("mem://")
        .session("prop", "countries")
        .migrations(MIGRATIONS)
        .init()
        .await
        .expect("in-memory database");
    SurrealCountryRepository::new(db)
}

fn country_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,15}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn whitespace_only_names_never_parse(raw in "[ \t\r\n]{0,10}") {
        let err = CountryName::parse(raw).expect_err("blank name");
        prop_assert!(matches!(err, CountryError::Validation { .. }));
    }

    #[test]
    fn names_with_content_parse_verbatim(raw in "[ ]{0,3}[A-Za-z][A-Za-z ]{0,15}") {
        let name = CountryName::parse(raw.clone()).expect("valid name");
        prop_assert_eq!(name.as_str(), raw.as_str());
        prop_assert_eq!(name.key(), raw.to_lowercase());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn created_records_read_back_and_block_case_variants(name in country_name()) {
        block_on(async {
            let repo = repository().await;

            let created = repo.create(&name).await.expect("create");
            let found = repo.get_by_id(&created.id).await.expect("get");
            assert_eq!(found.as_ref(), Some(&created));

            for variant in [name.to_uppercase(), name.to_lowercase()] {
                let err = repo.create(&variant).await.expect_err("case variant");
                assert!(matches!(err, CountryError::Conflict { .. }));
            }

            let renamed = repo.update(&created.id, &name.to_uppercase()).await.expect("own name");
            assert_eq!(renamed.id, created.id);
        });
    }

    #[test]
    fn get_all_returns_exactly_what_was_created(
        keys in btree_set("[a-z]{1,10}", 0..6),
    ) {
        block_on(async {
            let repo = repository().await;

            let mut created = Vec::new();
            for key in &keys {
                created.push(repo.create(key).await.expect("create"));
            }

            let mut all = repo.get_all().await.expect("list");
            all.sort_by(|a, b| a.id.cmp(&b.id));
            created.sort_by(|a, b| a.id.cmp(&b.id));
            assert_eq!(all, created);
        });
    }
}
