use chrono::{Datelike, Utc};

use lawfirm_cms::{
    app_state::AppState,
    config::Config,
    content::{
        Announcement, AnnouncementFields, ArticleText, Lawyer, LawyerFields, LawyerText,
        TranslationInput,
    },
    core::Language,
    AppResult,
};

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    println!("Seeding sample content");

    let config = Config::from_env()?;
    if let Some(parent) = config.database.file_path().and_then(|p| p.parent().map(|d| d.to_path_buf())) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(&parent)
                .map_err(|e| lawfirm_cms::AppError::Internal(e.to_string()))?;
        }
    }
    println!("Database: {}", config.database.url);

    let state = AppState::new(config).await?;

    let lawyer = state
        .content::<Lawyer>()
        .create(
            LawyerFields {
                is_partner: true,
                is_founder: true,
                has_phd: true,
                rank: 1,
                ..Default::default()
            },
            vec![
                TranslationInput::new(
                    Language::Tr,
                    LawyerText::new(
                        "Ayşe Yılmaz",
                        "Kurucu Ortak",
                        "Ticaret ve şirketler hukuku alanında yirmi yılı aşkın deneyim.",
                    ),
                ),
                TranslationInput::new(
                    Language::En,
                    LawyerText::new(
                        "Ayşe Yılmaz",
                        "Founding Partner",
                        "Over twenty years of experience in commercial and corporate law.",
                    ),
                ),
            ],
        )
        .await?;
    println!("Created lawyer {} ({})", lawyer.entity.id, lawyer.entity.slug);

    let today = Utc::now().date_naive();
    let announcement = state
        .content::<Announcement>()
        .create(
            AnnouncementFields {
                date: today,
                year: today.year(),
                image: None,
                category: "firm-news".to_string(),
                is_dark: false,
                published: true,
            },
            vec![
                TranslationInput::new(
                    Language::Tr,
                    ArticleText::new(
                        "Yeni Ofisimiz Açıldı",
                        "İstanbul ofisimiz yeni adresinde hizmet veriyor.",
                        "<p>Levent'teki yeni ofisimizde sizleri ağırlamaktan mutluluk duyarız.</p>",
                    ),
                ),
                TranslationInput::new(
                    Language::En,
                    ArticleText::new(
                        "Our New Office Is Open",
                        "Our Istanbul office has moved to a new address.",
                        "<p>We look forward to welcoming you at our new office in Levent.</p>",
                    ),
                ),
            ],
        )
        .await?;
    println!(
        "Created announcement {} ({})",
        announcement.entity.id, announcement.entity.slug
    );

    println!("Seeding complete");
    Ok(())
}
