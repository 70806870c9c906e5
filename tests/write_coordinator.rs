use chrono::NaiveDate;
use futures::future::join_all;
use std::collections::HashSet;

use lawfirm_cms::{
    app_state::AppState,
    config::Config,
    content::{
        Announcement, AnnouncementFields, ArticleText, Event, EventFields, Lawyer, LawyerFields,
        LawyerText, Publication, PublicationFields, TranslationInput,
    },
    core::Language,
    infrastructure::{ContentStore, Database, ListFilter},
    AppError,
};

async fn state() -> AppState {
    let db = Database::connect_in_memory().await.unwrap();
    AppState::with_database(db, Config::default())
}

fn announcement_fields() -> AnnouncementFields {
    AnnouncementFields {
        date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
        year: 2024,
        image: None,
        category: "firm-news".to_string(),
        is_dark: true,
        published: true,
    }
}

fn article<K>(language: Language, title: &str) -> TranslationInput<K>
where
    K: lawfirm_cms::content::ContentKind<Text = ArticleText>,
{
    TranslationInput::new(language, ArticleText::new(title, "", ""))
}

#[tokio::test]
async fn test_round_trip_every_language() {
    let state = state().await;
    let events = state.content::<Event>();

    let fields = EventFields {
        date: NaiveDate::from_ymd_opt(2024, 9, 12).unwrap(),
        location: "İstanbul".to_string(),
        image: None,
        category: "seminar".to_string(),
        published: true,
    };
    let tr = TranslationInput::<Event>::new(
        Language::Tr,
        ArticleText::new("KVKK Semineri", "Kısa özet", "<p>İçerik</p>"),
    );
    let en = TranslationInput::<Event>::new(
        Language::En,
        ArticleText::new("Data Protection Seminar", "Short summary", "<p>Content</p>"),
    );

    let created = events
        .create(fields.clone(), vec![tr.clone(), en.clone()])
        .await
        .unwrap();

    for input in [&tr, &en] {
        let record = events
            .get_localized(created.entity.id, input.language)
            .await
            .unwrap();
        assert_eq!(record.text, input.text);
        assert_eq!(record.fields, fields);
        assert_eq!(record.language, Some(input.language));
    }
}

#[tokio::test]
async fn test_slug_is_stable_across_updates() {
    let state = state().await;
    let announcements = state.content::<Announcement>();

    let created = announcements
        .create(announcement_fields(), vec![article(Language::Tr, "İlk Başlık")])
        .await
        .unwrap();
    let slug = created.entity.slug.clone();
    assert!(slug.starts_with("ilk-baslik-"), "slug was {}", slug);

    for title in ["İkinci Başlık", "Üçüncü"] {
        let updated = announcements
            .update(
                created.entity.id,
                announcement_fields(),
                Some(article(Language::Tr, title)),
                vec![],
            )
            .await
            .unwrap();
        assert_eq!(updated.entity.slug, slug);
    }

    let by_slug = announcements.get_by_slug(&slug).await.unwrap();
    assert_eq!(by_slug.translations[0].text.title, "Üçüncü");
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_slugs() {
    let state = state().await;
    let announcements = state.content::<Announcement>();

    let creates = (0..16).map(|_| {
        let service = announcements.clone();
        async move {
            service
                .create(announcement_fields(), vec![article(Language::Tr, "Aynı Başlık")])
                .await
        }
    });

    let results = join_all(creates).await;
    let slugs: HashSet<String> = results
        .into_iter()
        .map(|r| r.unwrap().entity.slug)
        .collect();

    assert_eq!(slugs.len(), 16);
    assert!(slugs.iter().all(|s| s.starts_with("ayni-baslik-")));
}

#[tokio::test]
async fn test_lawyer_with_only_turkish_falls_back() {
    let state = state().await;
    let lawyers = state.content::<Lawyer>();

    let created = lawyers
        .create(
            LawyerFields {
                is_partner: true,
                rank: 1,
                ..Default::default()
            },
            vec![TranslationInput::new(
                Language::Tr,
                LawyerText::new("Ayşe Yılmaz", "Ortak", "Biyografi"),
            )],
        )
        .await
        .unwrap();

    let record = lawyers
        .get_localized(created.entity.id, Language::En)
        .await
        .unwrap();
    assert_eq!(record.text.name, "Ayşe Yılmaz");
    assert_eq!(record.text.title, "Ortak");
    assert_eq!(record.language, Some(Language::Tr));
    assert!(record.fields.is_partner);
}

#[tokio::test]
async fn test_english_only_update_leaves_turkish() {
    let state = state().await;
    let announcements = state.content::<Announcement>();

    let created = announcements
        .create(
            announcement_fields(),
            vec![
                article(Language::Tr, "Duyuru"),
                article(Language::En, "Announcement"),
            ],
        )
        .await
        .unwrap();
    let id = created.entity.id;
    let before = announcements.get(id).await.unwrap();
    let tr_before = before.translation(Language::Tr).unwrap();

    announcements
        .update(
            id,
            announcement_fields(),
            Some(article(Language::En, "Announcement (revised)")),
            vec![],
        )
        .await
        .unwrap();

    let after = announcements.get(id).await.unwrap();
    let tr_after = after.translation(Language::Tr).unwrap();
    assert_eq!(tr_after.text, tr_before.text);
    assert_eq!(tr_after.updated_at, tr_before.updated_at);
    assert_eq!(
        after.translation(Language::En).unwrap().text.title,
        "Announcement (revised)"
    );
}

#[tokio::test]
async fn test_publication_delete_leaves_no_orphans() {
    let state = state().await;
    let publications = state.content::<Publication>();

    let created = publications
        .create(
            PublicationFields {
                date: NaiveDate::from_ymd_opt(2022, 2, 2).unwrap(),
                category: "newsletter".to_string(),
                image: None,
                document_url: Some("https://cdn.example.com/bulten.pdf".to_string()),
                published: true,
            },
            vec![
                article(Language::Tr, "Bülten"),
                article(Language::En, "Bulletin"),
            ],
        )
        .await
        .unwrap();
    let id = created.entity.id;

    publications.delete(id).await.unwrap();

    for language in Language::ALL {
        assert!(matches!(
            publications.get_localized(id, language).await,
            Err(AppError::NotFound(_))
        ));
    }

    let mut conn = state.db.pool().acquire().await.unwrap();
    let remaining = ContentStore::<Publication>::count_translations(&mut conn, id)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn test_failed_translation_write_rolls_back_entity() {
    let state = state().await;
    let announcements = state.content::<Announcement>();

    let err = announcements
        .create(
            announcement_fields(),
            vec![article(Language::En, "One"), article(Language::En, "Two")],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    assert!(announcements
        .list(&ListFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_lawyers_list_by_rank() {
    let state = state().await;
    let lawyers = state.content::<Lawyer>();

    for (rank, name) in [(3, "Can"), (1, "Ayşe"), (2, "Burak")] {
        lawyers
            .create(
                LawyerFields {
                    rank,
                    ..Default::default()
                },
                vec![TranslationInput::new(
                    Language::Tr,
                    LawyerText::new(name, "Avukat", ""),
                )],
            )
            .await
            .unwrap();
    }

    let records = lawyers
        .list_localized(&ListFilter::default(), Language::Tr)
        .await
        .unwrap();
    let names: Vec<&str> = records.iter().map(|r| r.text.name.as_str()).collect();
    assert_eq!(names, vec!["Ayşe", "Burak", "Can"]);
}

#[tokio::test]
async fn test_failed_translation_upsert_rolls_back_update() {
    let state = state().await;
    let announcements = state.content::<Announcement>();

    let mut original = announcement_fields();
    original.category = "a".to_string();
    let created = announcements
        .create(original.clone(), vec![article(Language::Tr, "Eski")])
        .await
        .unwrap();
    let id = created.entity.id;
    let before = announcements.get(id).await.unwrap();

    sqlx::query(
        "CREATE TRIGGER reject_english BEFORE INSERT ON announcement_translations
         WHEN NEW.language = 'EN'
         BEGIN SELECT RAISE(ABORT, 'english rejected'); END",
    )
    .execute(state.db.pool())
    .await
    .unwrap();

    let mut changed = announcement_fields();
    changed.category = "b".to_string();
    let err = announcements
        .update(
            id,
            changed,
            Some(article(Language::Tr, "Yeni")),
            vec![article(Language::En, "New")],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Database(_)), "got {:?}", err);

    let after = announcements.get(id).await.unwrap();
    assert_eq!(after.entity.fields, original);
    assert_eq!(after.entity.updated_at, before.entity.updated_at);
    assert_eq!(after.languages(), vec![Language::Tr]);
    assert_eq!(after.translation(Language::Tr).unwrap().text.title, "Eski");
}
