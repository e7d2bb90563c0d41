//! Bulletin handlers.

use colored::Colorize;
use serde::Serialize;
use unipa::{BulletinCategory, BulletinDetail, BulletinSummary};

use crate::output::{format_date, PlainPrint, TableRow};

/// Category summary line.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub index: usize,
    pub title: String,
    pub total: u32,
    pub shown: usize,
    pub unread: usize,
    pub items: Vec<BulletinInfo>,
}

impl CategoryInfo {
    pub fn from_category(index: usize, c: &BulletinCategory) -> Self {
        Self {
            index,
            title: c.title.clone().unwrap_or_default(),
            total: c.total_count,
            shown: c.items.len(),
            unread: c.items.iter().filter(|i| i.unread).count(),
            items: c
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| BulletinInfo::from_summary(i, item))
                .collect(),
        }
    }
}

impl CategoryInfo {
    /// Plain print the category line followed by its item lines.
    pub fn plain_print_with_items(&self) {
        self.plain_print();
        for item in &self.items {
            item.plain_print();
        }
    }
}

impl TableRow for CategoryInfo {
    fn headers() -> Vec<&'static str> {
        vec!["#", "Category", "Total", "Shown", "Unread"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.title.clone(),
            self.total.to_string(),
            self.shown.to_string(),
            self.unread.to_string(),
        ]
    }
}

impl PlainPrint for CategoryInfo {
    fn plain_print(&self) {
        println!(
            "[{}] {} {}",
            self.index.to_string().cyan(),
            self.title.bold(),
            format!("(全{}件, {} unread)", self.total, self.unread).dimmed()
        );
    }
}

/// One bulletin line.
#[derive(Debug, Clone, Serialize)]
pub struct BulletinInfo {
    pub index: usize,
    pub unread: bool,
    pub important: bool,
    pub title: String,
    pub sender: String,
    pub date: String,
}

impl BulletinInfo {
    pub fn from_summary(index: usize, s: &BulletinSummary) -> Self {
        Self {
            index,
            unread: s.unread,
            important: s.important,
            title: s.title.clone().unwrap_or_default(),
            sender: s.sender.clone().unwrap_or_default(),
            date: format_date(s.posted_date),
        }
    }

    fn flags(&self) -> String {
        format!(
            "{}{}",
            if self.unread { "*" } else { " " },
            if self.important { "!" } else { " " }
        )
    }
}

impl TableRow for BulletinInfo {
    fn headers() -> Vec<&'static str> {
        vec!["#", "Flags", "Title", "From", "Date"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.flags(),
            self.title.clone(),
            self.sender.clone(),
            self.date.clone(),
        ]
    }
}

impl PlainPrint for BulletinInfo {
    fn plain_print(&self) {
        let title = if self.unread {
            self.title.bold().to_string()
        } else {
            self.title.clone()
        };
        let mark = if self.important {
            "!".red().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  [{}]{} {} {} {}",
            self.index.to_string().cyan(),
            mark,
            title,
            self.sender.dimmed(),
            self.date.dimmed()
        );
    }
}

/// Print a bulletin detail in plain form.
pub fn print_detail(detail: &BulletinDetail) {
    println!("{}", detail.title.clone().unwrap_or_default().bold());
    if let Some(sender) = &detail.sender {
        println!("From: {}", sender);
    }
    println!();
    if let Some(body) = &detail.body_html {
        println!("{}", body);
    }
    if !detail.attachments.is_empty() {
        println!();
        println!("Attachments:");
        for (i, att) in detail.attachments.iter().enumerate() {
            println!("  [{}] {} ({})", i.to_string().cyan(), att.name, att.size);
        }
    }
}
