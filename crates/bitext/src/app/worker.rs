use super::{App, TranslationRequest, TranslationResponse};
use bitext_core::translate::translate_pending;
use bitext_core::{DemoTranslator, LoadTicket};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

impl App {
    fn ensure_translation_worker(&mut self) {
        if self.translate_tx.is_some() {
            return;
        }
        let (req_tx, req_rx) = mpsc::channel::<TranslationRequest>();
        let (resp_tx, resp_rx) = mpsc::channel::<TranslationResponse>();
        let delay = self.translation_delay;
        thread::spawn(move || {
            let translator = DemoTranslator::new();
            while let Ok(req) = req_rx.recv() {
                if delay > Duration::ZERO {
                    thread::sleep(delay);
                }
                let translations = translate_pending(&req.document, &translator);
                let _ = resp_tx.send(TranslationResponse {
                    ticket: req.ticket,
                    translations,
                });
            }
        });
        self.translate_tx = Some(req_tx);
        self.translate_rx = Some(resp_rx);
    }

    /// Hand the current document to the translation worker under `ticket`
    pub(crate) fn dispatch_translation(&mut self, ticket: LoadTicket) {
        let Some(document) = self.viewer.store().get(&ticket.document_id).cloned() else {
            return;
        };
        self.ensure_translation_worker();
        let Some(tx) = self.translate_tx.as_ref() else {
            return;
        };
        debug!(
            id = %ticket.document_id,
            pending = document.pending_count(),
            "translation dispatched"
        );
        if tx.send(TranslationRequest { ticket, document }).is_err() {
            warn!("translation worker is gone");
            self.translate_tx = None;
            self.translate_rx = None;
        }
    }

    pub(crate) fn poll_translation_responses(&mut self) {
        let Some(rx) = self.translate_rx.as_ref() else {
            return;
        };
        let responses: Vec<TranslationResponse> = rx.try_iter().collect();
        for resp in responses {
            let now = self.now();
            if self.viewer.finish_load(now, &resp.ticket, resp.translations) {
                self.set_status("Translation complete");
            }
        }
    }

    /// Re-run translation for a document that still has pending paragraphs
    pub(crate) fn resume_translation(&mut self) {
        let now = self.now();
        if let Some(ticket) = self.viewer.resume_pending(now) {
            self.dispatch_translation(ticket);
        }
    }
}
