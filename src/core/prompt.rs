use crate::core::postprocess::{ADVICE_MARKER, FORBIDDEN_SYMBOLS};
use crate::domain::model::{FortuneMode, FortuneRequest, NumerologyProfile};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// 結果固定要有的欄位，依序輸出
pub const OUTPUT_FIELDS: [&str; 7] = [
    "総合運",
    "仕事運",
    "恋愛運",
    "金運",
    "健康運",
    "ラッキーカラー",
    "ラッキーアイテム",
];

pub const BULLET: &str = "・";

pub const WEEK_LENGTH: i64 = 7;

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    }
}

/// `start` 起 7 天的欄位名稱，例如 `05/15(水)`
pub fn week_day_labels(start: NaiveDate) -> Vec<String> {
    (0..WEEK_LENGTH)
        .map(|offset| {
            let date = start + Duration::days(offset);
            format!(
                "{:02}/{:02}({})",
                date.month(),
                date.day(),
                weekday_label(date.weekday())
            )
        })
        .collect()
}

/// 組出送給模型的指示文字。純字串組裝，不會失敗。
pub fn build_prompt(request: &FortuneRequest, profile: Option<&NumerologyProfile>) -> String {
    let subject = match request.mode {
        FortuneMode::Daily => format!(
            "生年月日 {} の {} の今日の運勢を占ってください。",
            request.birth_date, request.gender
        ),
        FortuneMode::Weekly { start } => format!(
            "生年月日 {} の {} の {} から7日間の運勢を占ってください。",
            request.birth_date,
            request.gender,
            start.format("%Y/%m/%d")
        ),
    };
    let mut sections = vec![format!("あなたはプロの占い師です。\n{}", subject)];

    if let Some(profile) = profile {
        sections.push(format!(
            "【占術データ】\n{b}干支五行: {}\n{b}運命星: {}\n{b}タイプ: {}",
            profile.zodiac_element,
            profile.destiny_star,
            profile.type_label,
            b = BULLET
        ));
    }

    if let Some(question) = request.question() {
        sections.push(format!(
            "【相談内容】\n{}\nこの相談にも占いの結果として答えてください。",
            question
        ));
    }

    let forbidden: String = FORBIDDEN_SYMBOLS.iter().collect();
    sections.push(format!(
        "【ルール】\n\
         {b}次の記号は使わないでください: {}\n\
         {b}箇条書きには「{b}」を使ってください。\n\
         {b}全体で200文字程度にまとめてください。\n\
         {b}ポジティブなアドバイスを含めてください。",
        forbidden,
        b = BULLET
    ));

    let mut fields: Vec<String> = OUTPUT_FIELDS.iter().map(|f| f.to_string()).collect();
    if let FortuneMode::Weekly { start } = request.mode {
        fields.extend(week_day_labels(start));
    }
    let mut format_block = String::from("【出力形式】\n");
    for field in &fields {
        format_block.push_str(&format!("{}{}: \n", BULLET, field));
    }
    format_block.push_str(ADVICE_MARKER);
    format_block.push_str("\n(最後にひとことアドバイス)");
    sections.push(format_block);

    sections.join("\n\n")
}
