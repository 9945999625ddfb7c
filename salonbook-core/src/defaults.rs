use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

use crate::Service;

const DEFAULT_SERVICES: [(&str, &str, u32, Option<(u32, u32)>); 15] = [
    ("Фейд-стрижка", "Анна", 2400, None),
    ("Классическая стрижка", "Иван", 2200, Some((10, 0))),
    ("Коррекция бороды", "Сергей", 1600, Some((11, 30))),
    ("Горячее полотенце", "Мария", 1300, Some((12, 0))),
    ("Детская стрижка", "Антон", 1800, Some((13, 0))),
    ("Блеск цвета", "Елена", 3200, Some((14, 30))),
    ("Укладка", "Ольга", 1500, Some((15, 0))),
    ("SPA-мытьё", "Дмитрий", 900, Some((9, 30))),
    ("Королевское бритьё", "Кирилл", 2600, Some((16, 0))),
    ("Коррекция бровей", "Наталья", 1100, Some((10, 30))),
    ("Массаж головы", "Виктор", 1400, Some((11, 0))),
    ("Экспресс-стрижка", "Олег", 2000, Some((12, 30))),
    ("Свадебный набор", "Светлана", 4500, Some((13, 30))),
    ("Детокс-процедура", "Роман", 2800, Some((14, 0))),
    ("Премиум-комбо", "Полина", 5100, Some((15, 30))),
];

pub const DEFAULT_SERVICE_COUNT: usize = DEFAULT_SERVICES.len();

/// The seed catalog. Entry `i` is dated `i` days after `now`; the first one
/// takes the current time of day, truncated to the minute.
pub fn default_services(now: NaiveDateTime) -> Vec<Service> {
    let today = now.date();
    let current = now
        .time()
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or_default();

    DEFAULT_SERVICES
        .iter()
        .enumerate()
        .map(|(offset, (title, master, cost, slot))| {
            let time = slot
                .and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0))
                .unwrap_or(current);
            Service::new(*title, *master, *cost).scheduled(today + Duration::days(offset as i64), time)
        })
        .collect()
}
