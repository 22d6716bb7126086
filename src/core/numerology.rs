//! 由生日推導的三個標籤。全部是固定表格的取餘查表，不檢查日期是否存在。

use crate::domain::model::{BirthDate, NumerologyProfile};

/// 以 `year mod 12` 查表的地支與五行
pub const ZODIAC_ELEMENTS: [&str; 12] = [
    "申(金)", "酉(金)", "戌(土)", "亥(水)", "子(水)", "丑(土)",
    "寅(木)", "卯(木)", "辰(土)", "巳(火)", "午(火)", "未(土)",
];

/// 以 `(year - 1900) mod 6` 查表的命星
pub const DESTINY_STARS: [&str; 6] = ["土星人", "金星人", "火星人", "天王星人", "木星人", "水星人"];

/// 以 `(year + month + day) mod 12` 查表的月相類型
pub const TYPE_LABELS: [&str; 12] = [
    "新月", "三日月", "上弦の月", "十三夜", "満月", "十六夜",
    "立待月", "居待月", "寝待月", "更待月", "下弦の月", "有明月",
];

// rem_euclid 保證 1900 年以前也落在表內
fn index(value: i64, len: usize) -> usize {
    value.rem_euclid(len as i64) as usize
}

pub fn zodiac_element(year: i32) -> &'static str {
    ZODIAC_ELEMENTS[index(i64::from(year), ZODIAC_ELEMENTS.len())]
}

pub fn destiny_star(year: i32) -> &'static str {
    DESTINY_STARS[index(i64::from(year) - 1900, DESTINY_STARS.len())]
}

pub fn type_label(year: i32, month: u32, day: u32) -> &'static str {
    let sum = i64::from(year) + i64::from(month) + i64::from(day);
    TYPE_LABELS[index(sum, TYPE_LABELS.len())]
}

pub fn profile(birth_date: &BirthDate) -> NumerologyProfile {
    let year = birth_date.year();
    NumerologyProfile {
        zodiac_element: zodiac_element(year),
        destiny_star: destiny_star(year),
        type_label: type_label(year, birth_date.month(), birth_date.day()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zodiac_element_by_year() {
        assert_eq!(zodiac_element(1990), ZODIAC_ELEMENTS[10]);
        assert_eq!(zodiac_element(1990), "午(火)");
        assert_eq!(zodiac_element(2016), "申(金)");
        assert_eq!(zodiac_element(2020), "子(水)");
        assert_eq!(zodiac_element(1990), zodiac_element(2002));
    }

    #[test]
    fn test_destiny_star_cycle() {
        assert_eq!(destiny_star(1900), DESTINY_STARS[0]);
        assert_eq!(destiny_star(1905), DESTINY_STARS[5]);
        assert_eq!(destiny_star(1906), DESTINY_STARS[0]);
        for year in 1900..2100 {
            assert_eq!(
                destiny_star(year),
                DESTINY_STARS[((year - 1900) % 6) as usize]
            );
        }
    }

    #[test]
    fn test_years_before_1900_stay_in_table() {
        assert_eq!(destiny_star(1899), DESTINY_STARS[5]);
        assert_eq!(destiny_star(0), DESTINY_STARS[2]);
        assert_eq!(zodiac_element(0), ZODIAC_ELEMENTS[0]);
    }

    #[test]
    fn test_type_label_sum() {
        // 1990 + 5 + 15 = 2010, 2010 mod 12 = 6
        assert_eq!(type_label(1990, 5, 15), TYPE_LABELS[6]);
        // 月份 13 也照樣計算
        assert_eq!(type_label(2000, 13, 1), TYPE_LABELS[(2014 % 12) as usize]);
    }

    #[test]
    fn test_profile_is_deterministic_for_non_calendar_date() {
        let date = BirthDate::parse("99999999").unwrap();
        let first = profile(&date);
        let second = profile(&date);
        assert_eq!(first, second);
        assert_eq!(first.zodiac_element, ZODIAC_ELEMENTS[(9999 % 12) as usize]);
        assert_eq!(first.destiny_star, DESTINY_STARS[((9999 - 1900) % 6) as usize]);
        assert_eq!(first.type_label, TYPE_LABELS[((9999 + 99 + 99) % 12) as usize]);
    }
}
