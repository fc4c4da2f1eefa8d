//! Built-in seed content.
//!
//! Used when no stored document exists and whenever a partition (or the
//! whole document) is reset.

use chrono::NaiveDate;

use crate::types::{CompanyInfo, HeroConfig, Notice, SocialLinks, Technology};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn notice(
    id: u64,
    category: &str,
    title: &str,
    date: NaiveDate,
    views: u64,
    content: &str,
) -> Notice {
    Notice {
        id,
        category: category.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        date,
        views,
    }
}

fn technology(
    id: &str,
    title: &str,
    subtitle: &str,
    description: &str,
    icon: &str,
    gradient: &str,
) -> Technology {
    Technology {
        id: id.to_string(),
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        gradient: gradient.to_string(),
    }
}

#[rustfmt::skip]
pub fn notices() -> Vec<Notice> {
    vec![
        notice(1, "채용", "[정규직] NPU 설계 엔지니어 채용 공고", date(2026, 1, 28), 234, "NPU 설계 경력자를 모집합니다."),
        notice(2, "채용", "[정규직] 임베디드 소프트웨어 개발자 채용", date(2026, 1, 25), 189, "임베디드 SW 개발 경력자를 모집합니다."),
        notice(3, "공지", "2026년 상반기 인턴십 프로그램 안내", date(2026, 1, 20), 456, "인턴십 프로그램에 대한 안내입니다."),
        notice(4, "뉴스", "Code Gear, 법인 설립 완료", date(2026, 1, 15), 789, "주식회사 코드기어 법인 설립을 완료했습니다."),
        notice(5, "공지", "설 연휴 휴무 안내", date(2026, 1, 10), 123, "설 연휴 기간 휴무 안내입니다."),
        notice(6, "채용", "[계약직] FPGA 검증 엔지니어 채용", date(2026, 1, 8), 167, "FPGA 검증 엔지니어를 모집합니다."),
    ]
}

pub fn hero() -> HeroConfig {
    HeroConfig {
        main_copy: "Connecting Intelligence to Hardware".to_string(),
        sub_copy: "지능형 하드웨어의 미래를 설계합니다".to_string(),
        cta_text: "기술 알아보기".to_string(),
    }
}

pub fn company() -> CompanyInfo {
    CompanyInfo {
        name: "주식회사 코드기어".to_string(),
        name_en: "Code Gear Inc.".to_string(),
        ceo: "대표이사".to_string(),
        address: "충청남도 천안시 서북구 불당동".to_string(),
        address_detail: "불당로 XX, XX층".to_string(),
        business_number: "XXX-XX-XXXXX".to_string(),
        phone: "041-XXX-XXXX".to_string(),
        fax: "041-XXX-XXXX".to_string(),
        email: "contact@codegear.co.kr".to_string(),
        copyright_year: 2026,
    }
}

pub fn social() -> SocialLinks {
    SocialLinks {
        github: "https://github.com/codegear".to_string(),
        linkedin: "https://linkedin.com/company/codegear".to_string(),
        twitter: "https://twitter.com/codegear".to_string(),
    }
}

#[rustfmt::skip]
pub fn technologies() -> Vec<Technology> {
    vec![
        technology("npu", "NPU 설계", "Neural Processing Unit", "고효율 신경망 처리 유닛 설계 및 최적화", "cpu", "from-blue-500 to-cyan-500"),
        technology("robot-control", "로봇 제어 시스템", "Robot Control System", "정밀 모션 제어 및 실시간 로봇 시스템", "robot", "from-purple-500 to-pink-500"),
        technology("semiconductor-ip", "시스템 반도체 IP", "System Semiconductor IP", "맞춤형 반도체 IP 코어 설계 및 라이센싱", "chip", "from-orange-500 to-red-500"),
        technology("embedded-sw", "임베디드 소프트웨어", "Embedded Software", "저전력 고성능 임베디드 시스템 개발", "code", "from-green-500 to-emerald-500"),
        technology("ai-accelerator", "AI 가속기", "AI Accelerator", "머신러닝 추론 가속을 위한 전용 하드웨어", "zap", "from-yellow-500 to-orange-500"),
        technology("fpga-design", "FPGA 설계", "FPGA Design", "프로토타이핑 및 커스텀 로직 구현", "grid", "from-indigo-500 to-purple-500"),
        technology("soc-integration", "SoC 통합", "System on Chip", "시스템 온 칩 아키텍처 설계 및 통합", "layers", "from-teal-500 to-cyan-500"),
        technology("verification", "설계 검증", "Design Verification", "하드웨어 설계 검증 및 테스트 자동화", "check-circle", "from-rose-500 to-pink-500"),
    ]
}
