//! In-memory collaborators shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use recall_watch_lib::domain::{PageFetcher, RecallError, RecallResult, ScoringOracle};

pub const BASE: &str = "https://rappel.conso.gouv.fr";

pub fn listing_url(page: u32) -> String {
    format!("{BASE}/categorie/94/{page}")
}

pub fn detail_url(id: u32) -> String {
    format!("{BASE}/fiche-rappel/{id}/Interne")
}

pub fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(hh, mm, ss))
        .unwrap()
}

/// One listing entry as the site renders it
pub fn listing_item(id: u32, title: &str, date: &str) -> String {
    format!(
        r#"<li class="product-item">
             <a class="product-link" href="/fiche-rappel/{id}/Interne">{title}</a>
             <p class="product-maker">Charcuterie Martin</p>
             <div class="product-desc">
               <div class="product-desc-item">Risques : Listeria monocytogenes</div>
               <div class="product-desc-item">Motif : Présence de Listeria</div>
             </div>
             <p class="product-date">Publié le <time datetime="{date}">{date}</time></p>
           </li>"#
    )
}

pub fn listing_page(items: &[String]) -> String {
    format!(
        r#"<html><body><ul class="product-list">{}</ul></body></html>"#,
        items.concat()
    )
}

pub fn detail_page(zone: &str) -> String {
    format!(
        r#"<html><body><ul>
             <li class="product-desc-item"><span class="carac">Marque :</span><span class="val">Martin</span></li>
             <li class="product-desc-item"><span class="carac">Zone géographique de vente :</span><span class="val">{zone}</span></li>
           </ul></body></html>"#
    )
}

/// Serves canned responses by URL and records every request in order.
/// Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, RecallResult<String>>,
    requests: Mutex<Vec<String>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Ok(body.into()));
        self
    }

    pub fn status(mut self, url: impl Into<String>, status: u16) -> Self {
        let url = url.into();
        self.pages
            .insert(url.clone(), Err(RecallError::HttpStatus { status, url }));
        self
    }

    pub fn error(mut self, url: impl Into<String>, err: RecallError) -> Self {
        self.pages.insert(url.into(), Err(err));
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeSite {
    async fn fetch(&self, url: &str) -> RecallResult<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().unwrap_or_else(|| {
            Err(RecallError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
        })
    }
}

/// Answers from a queue, failing once it runs dry
#[derive(Default)]
pub struct ScriptedOracle {
    answers: Mutex<VecDeque<RecallResult<String>>>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedOracle {
    pub fn new<I>(answers: I) -> Arc<Self>
    where
        I: IntoIterator<Item = RecallResult<String>>,
    {
        Arc::new(Self {
            answers: Mutex::new(answers.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoringOracle for ScriptedOracle {
    async fn complete(&self, system: &str, user: &str) -> RecallResult<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RecallError::scoring("no scripted answer left")))
    }
}
