//! Built-in sample articles served when the news API cannot be reached.

use chrono::Utc;

use super::{Language, NewsItem, DEFAULT_LANGUAGE};

struct Sample {
    id: &'static str,
    title: &'static str,
    content: &'static str,
    why: &'static str,
    how: &'static str,
    category: &'static str,
    image_url: &'static str,
    action_url: &'static str,
}

const EN: &[Sample] = &[
    Sample {
        id: "1",
        title: "ChatGPT Vision Update",
        content: "OpenAI's ChatGPT can now analyze images, read documents, and understand visual content in real-time.",
        why: "This makes AI more versatile for students and professionals who work with visual data, presentations, and documents.",
        how: "Upload screenshots, charts, or documents to ChatGPT and ask specific questions about the content.",
        category: "AI",
        image_url: "https://images.pexels.com/photos/8386440/pexels-photo-8386440.jpeg",
        action_url: "https://chat.openai.com",
    },
    Sample {
        id: "2",
        title: "GitHub Copilot Workspace",
        content: "GitHub's new Copilot Workspace can understand entire codebases and suggest comprehensive solutions to bugs and features.",
        why: "This dramatically speeds up development cycles and helps developers learn best practices from AI-generated code.",
        how: "Sign up for GitHub Copilot and integrate it with your IDE. Start with simple code completion and gradually use advanced features.",
        category: "Development",
        image_url: "https://images.pexels.com/photos/11035380/pexels-photo-11035380.jpeg",
        action_url: "https://github.com/features/copilot",
    },
];

const TE: &[Sample] = &[Sample {
    id: "1",
    title: "చాట్‌జిపిటి విజన్ అప్‌డేట్",
    content: "ఓపెన్ఎఐ యొక్క చాట్‌జిపిటి ఇప్పుడు చిత్రాలను విశ్లేషించగలదు, పత్రాలను చదవగలదు మరియు దృశ్య కంటెంట్‌ను నిజ సమయంలో అర్థం చేసుకోగలదు.",
    why: "ఇది దృశ్య డేటా, ప్రెజెంటేషన్లు మరియు పత్రాలతో పని చేసే విద్యార్థులు మరియు నిపుణులకు AIను మరింత బహుముఖంగా చేస్తుంది.",
    how: "చాట్‌జిపిటికి స్క్రీన్‌షాట్‌లు, చార్ట్‌లు లేదా పత్రాలను అప్‌లోడ్ చేసి, కంటెంట్ గురించి నిర్దిష్ట ప్రశ్నలు అడుగండి.",
    category: "AI",
    image_url: "https://images.pexels.com/photos/8386440/pexels-photo-8386440.jpeg",
    action_url: "https://chat.openai.com",
}];

const HI: &[Sample] = &[Sample {
    id: "1",
    title: "चैटजीपीटी विजन अपडेट",
    content: "ओपनएआई का चैटजीपीटी अब इमेज का विश्लेषण कर सकता है, दस्तावेज़ पढ़ सकता है और रीयल-टाइम में विजुअल कंटेंट को समझ सकता है।",
    why: "यह उन छात्रों और पेशेवरों के लिए एआई को अधिक बहुमुखी बनाता है जो विजुअल डेटा, प्रेजेंटेशन और दस्तावेज़ों के साथ काम करते हैं।",
    how: "चैटजीपीटी में स्क्रीनशॉट, चार्ट या दस्तावेज़ अपलोड करें और कंटेंट के बारे में विशिष्ट प्रश्न पूछें।",
    category: "AI",
    image_url: "https://images.pexels.com/photos/8386440/pexels-photo-8386440.jpeg",
    action_url: "https://chat.openai.com",
}];

fn samples_for(language: &str) -> Option<&'static [Sample]> {
    match language {
        "en" => Some(EN),
        "te" => Some(TE),
        "hi" => Some(HI),
        _ => None,
    }
}

/// Sample deck for `language`, or the default-language deck when no
/// localized samples exist. Never empty.
pub fn sample_news(language: &str) -> Vec<NewsItem> {
    let samples = samples_for(language).unwrap_or_else(|| {
        tracing::debug!(language, fallback = DEFAULT_LANGUAGE, "No samples for language");
        EN
    });
    let now = Utc::now();

    samples
        .iter()
        .map(|s| NewsItem {
            id: s.id.to_string(),
            title: s.title.to_string(),
            content: s.content.to_string(),
            why: s.why.to_string(),
            how: s.how.to_string(),
            category: s.category.to_string(),
            image_url: Some(s.image_url.to_string()),
            action_url: Some(s.action_url.to_string()),
            created_at: now,
        })
        .collect()
}

/// The fixed list of supported languages.
pub fn default_languages() -> Vec<Language> {
    [("en", "English", "🇺🇸"), ("te", "తెలుగు", "🇮🇳"), ("hi", "हिंदी", "🇮🇳")]
        .into_iter()
        .map(|(code, name, flag)| Language {
            code: code.to_string(),
            name: name.to_string(),
            flag: flag.to_string(),
        })
        .collect()
}
