//! Session-Registry – Live-Raeume und Sende-Queues
//!
//! Die Registry ist die Routing-Autoritaet fuer den Echtzeit-Verkehr:
//! sie haelt pro Raum die geordnete Teilnehmerliste und pro Verbindung
//! eine Sende-Queue. Beide leben nur im Prozess; nach einem Neustart
//! ist die Registry leer.
//!
//! ## Ordnungsgarantie
//! Mutation der Teilnehmerliste und Zustellung an die Mitglieder eines
//! Raums passieren unter dem Eintrags-Guard des Raums – zwei Events
//! desselben Raums koennen ihr Fan-out nicht verschraenken. Zustellung
//! ist nicht-blockierendes `try_send` (Fire-and-forget): eine volle
//! Queue verwirft die Nachricht mit Warnung statt den Router zu
//! blockieren.

use dashmap::DashMap;
use signalhaus_core::{RaumId, VerbindungsId};
use signalhaus_protocol::{RelayArt, SignalEvent};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Groesse der Sende-Queue pro Verbindung
const SENDE_QUEUE_GROESSE: usize = 64;

// ---------------------------------------------------------------------------
// ClientSender
// ---------------------------------------------------------------------------

/// Handle auf die Sende-Queue einer verbundenen Verbindung
#[derive(Clone, Debug)]
struct ClientSender {
    id: VerbindungsId,
    tx: mpsc::Sender<SignalEvent>,
}

impl ClientSender {
    /// Stellt ein Event nicht-blockierend zu
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    fn senden(&self, event: SignalEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(verbindung = %self.id, "Sende-Queue voll, Event verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(verbindung = %self.id, "Sende-Queue geschlossen (Client getrennt)");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SessionRegistry
// ---------------------------------------------------------------------------

/// Live-Registry aller verbundenen Teilnehmer
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<SessionRegistryInner>,
}

struct SessionRegistryInner {
    /// Sende-Queues, indiziert nach VerbindungsId
    clients: DashMap<VerbindungsId, ClientSender>,
    /// Live-Raum -> Teilnehmer in Beitrittsreihenfolge
    raeume: DashMap<RaumId, Vec<VerbindungsId>>,
}

impl SessionRegistry {
    /// Erstellt eine leere SessionRegistry
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(SessionRegistryInner {
                clients: DashMap::new(),
                raeume: DashMap::new(),
            }),
        }
    }

    /// Registriert eine neue Verbindung und gibt ihre Empfangs-Queue zurueck
    ///
    /// Der Transport liest aus dieser Queue und schreibt auf den Socket.
    pub fn verbinden(&self, id: VerbindungsId) -> mpsc::Receiver<SignalEvent> {
        let (tx, rx) = mpsc::channel(SENDE_QUEUE_GROESSE);
        self.inner.clients.insert(id, ClientSender { id, tx });
        tracing::debug!(verbindung = %id, "Verbindung registriert");
        rx
    }

    /// Stellt ein Event an eine einzelne Verbindung zu
    pub fn senden_an(&self, id: &VerbindungsId, event: SignalEvent) -> bool {
        match self.inner.clients.get(id) {
            Some(sender) => sender.senden(event),
            None => {
                tracing::debug!(verbindung = %id, "Zustellung an unbekannte Verbindung");
                false
            }
        }
    }

    /// Fuegt eine Verbindung einem Raum hinzu und stellt beide Seiten vor
    ///
    /// Unbekannte Raum-IDs erzeugen lazy einen leeren Live-Raum. Ein
    /// erneuter Join derselben Verbindung ist ein No-op (idempotent,
    /// keine doppelten Eintraege, keine erneute Vorstellung). Eine
    /// Verbindung ist Teilnehmer hoechstens eines Raums: ein Join in
    /// einen anderen Raum verlaesst zuerst den bisherigen (`peer_left`
    /// an die Zurueckbleibenden, Eviction falls leer). Die Vorstellung
    /// ist symmetrisch: jeder bestehende Teilnehmer erhaelt
    /// `peer_joined` fuer den Neuen, der Neue eines pro Bestehendem.
    pub fn beitreten(&self, raum_id: &RaumId, id: VerbindungsId) -> bool {
        if self.ist_teilnehmer(raum_id, &id) {
            tracing::debug!(raum = %raum_id, verbindung = %id, "Erneuter Join ignoriert");
            return false;
        }

        // Hoechstens ein Raum pro Verbindung: erst den bisherigen
        // verlassen, dann beitreten
        self.aus_raeumen_entfernen(id);

        let mut teilnehmer = self.inner.raeume.entry(raum_id.clone()).or_default();

        // Vorstellung und Mutation unter dem Eintrags-Guard des Raums
        for peer in teilnehmer.iter() {
            self.senden_an(peer, SignalEvent::PeerJoined { id });
            self.senden_an(&id, SignalEvent::PeerJoined { id: *peer });
        }
        teilnehmer.push(id);

        tracing::info!(raum = %raum_id, verbindung = %id, anzahl = teilnehmer.len(), "Raum beigetreten");
        true
    }

    /// Leitet ein Relay-Event im Raum weiter
    ///
    /// Mit `ziel`: Zustellung nur an das Ziel, sofern es denselben Raum
    /// teilt. Ohne `ziel`: Fan-out an alle anderen Teilnehmer, nie an
    /// den Absender selbst. Nicht-Teilnehmer und unbekannte Ziele sind
    /// Diagnosen, keine Fehler – das Event wird verworfen.
    pub fn relay(
        &self,
        raum_id: &RaumId,
        absender: VerbindungsId,
        art: RelayArt,
        ziel: Option<VerbindungsId>,
        payload: serde_json::Value,
    ) -> usize {
        let Some(teilnehmer) = self.inner.raeume.get(raum_id) else {
            tracing::warn!(raum = %raum_id, verbindung = %absender, art = %art, "Relay in unbekannten Raum verworfen");
            return 0;
        };

        if !teilnehmer.contains(&absender) {
            tracing::warn!(raum = %raum_id, verbindung = %absender, art = %art, "Relay von Nicht-Teilnehmer verworfen");
            return 0;
        }

        match ziel {
            Some(ziel_id) => {
                if ziel_id == absender || !teilnehmer.contains(&ziel_id) {
                    tracing::warn!(
                        raum = %raum_id,
                        ziel = %ziel_id,
                        art = %art,
                        "Relay-Ziel nicht im Raum, Event verworfen"
                    );
                    return 0;
                }
                usize::from(self.senden_an(&ziel_id, art.event(absender, payload)))
            }
            None => {
                let mut zugestellt = 0;
                for peer in teilnehmer.iter().filter(|p| **p != absender) {
                    if self.senden_an(peer, art.event(absender, payload.clone())) {
                        zugestellt += 1;
                    }
                }
                zugestellt
            }
        }
    }

    /// Entfernt eine Verbindung aus allen Raeumen und der Registry
    ///
    /// Idempotent: ein zweiter Aufruf fuer dieselbe ID aendert nichts.
    /// Leere Raeume werden vollstaendig evakuiert; verbleibende
    /// Teilnehmer erhalten `peer_left`.
    pub fn trennen(&self, id: VerbindungsId) {
        self.aus_raeumen_entfernen(id);

        if self.inner.clients.remove(&id).is_some() {
            tracing::info!(verbindung = %id, "Verbindung getrennt");
        }
    }

    /// Entfernt die Verbindung aus allen Raeumen
    ///
    /// Verbleibende Teilnehmer erhalten `peer_left`; leer gewordene
    /// Raeume werden evakuiert. Gemeinsamer Pfad von Trennen und
    /// Raumwechsel.
    fn aus_raeumen_entfernen(&self, id: VerbindungsId) {
        // Die ID ist nicht nach Raum indiziert, daher Suche ueber alle Raeume
        self.inner.raeume.iter_mut().for_each(|mut eintrag| {
            let vorher = eintrag.value().len();
            eintrag.value_mut().retain(|teilnehmer| *teilnehmer != id);

            if eintrag.value().len() < vorher {
                for peer in eintrag.value().iter() {
                    self.senden_an(peer, SignalEvent::PeerLeft { id });
                }
                tracing::debug!(raum = %eintrag.key(), verbindung = %id, "Aus Raum entfernt");
            }
        });

        self.inner.raeume.retain(|raum_id, teilnehmer| {
            if teilnehmer.is_empty() {
                tracing::info!(raum = %raum_id, "Leerer Raum evakuiert");
                false
            } else {
                true
            }
        });
    }

    /// Gibt die Teilnehmer eines Raums in Beitrittsreihenfolge zurueck
    pub fn teilnehmer(&self, raum_id: &RaumId) -> Vec<VerbindungsId> {
        self.inner
            .raeume
            .get(raum_id)
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    /// Prueft ob die Verbindung Teilnehmer des Raums ist
    pub fn ist_teilnehmer(&self, raum_id: &RaumId, id: &VerbindungsId) -> bool {
        self.inner
            .raeume
            .get(raum_id)
            .is_some_and(|t| t.contains(id))
    }

    /// Gibt die Anzahl der Live-Raeume zurueck
    pub fn raum_anzahl(&self) -> usize {
        self.inner.raeume.len()
    }

    /// Gibt die Anzahl der registrierten Verbindungen zurueck
    pub fn verbindungs_anzahl(&self) -> usize {
        self.inner.clients.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::neu()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc::Receiver;

    fn beigetreten(
        registry: &SessionRegistry,
        raum: &RaumId,
    ) -> (VerbindungsId, Receiver<SignalEvent>) {
        let id = VerbindungsId::neu();
        let rx = registry.verbinden(id);
        registry.beitreten(raum, id);
        (id, rx)
    }

    fn alle_events(rx: &mut Receiver<SignalEvent>) -> Vec<SignalEvent> {
        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        events
    }

    #[tokio::test]
    async fn join_vorstellung_ist_symmetrisch() {
        let registry = SessionRegistry::neu();
        let raum = RaumId::neu("lobby");
        let anderer_raum = RaumId::neu("technik");

        let (a, mut rx_a) = beigetreten(&registry, &raum);
        let (b, mut rx_b) = beigetreten(&registry, &raum);
        let (_c, mut rx_c) = beigetreten(&registry, &anderer_raum);

        let events_a = alle_events(&mut rx_a);
        assert!(
            matches!(events_a.as_slice(), [SignalEvent::PeerJoined { id }] if *id == b),
            "A muss B vorgestellt bekommen"
        );

        let events_b = alle_events(&mut rx_b);
        assert!(
            matches!(events_b.as_slice(), [SignalEvent::PeerJoined { id }] if *id == a),
            "B muss A vorgestellt bekommen"
        );

        assert!(alle_events(&mut rx_c).is_empty(), "Dritter Raum bleibt unberuehrt");
    }

    #[tokio::test]
    async fn erneuter_join_ist_idempotent() {
        let registry = SessionRegistry::neu();
        let raum = RaumId::neu("lobby");

        let (a, mut rx_a) = beigetreten(&registry, &raum);
        assert!(!registry.beitreten(&raum, a), "Zweiter Join ist ein No-op");

        assert_eq!(registry.teilnehmer(&raum).len(), 1);
        assert!(alle_events(&mut rx_a).is_empty(), "Kein Event beim erneuten Join");
    }

    #[tokio::test]
    async fn raumwechsel_verlaesst_den_alten_raum() {
        let registry = SessionRegistry::neu();
        let alpha = RaumId::neu("alpha");
        let beta = RaumId::neu("beta");

        let (a, mut rx_a) = beigetreten(&registry, &alpha);
        let (b, mut rx_b) = beigetreten(&registry, &alpha);
        alle_events(&mut rx_a);
        alle_events(&mut rx_b);

        assert!(registry.beitreten(&beta, a), "Wechsel ist ein echter Join");
        assert!(
            !registry.ist_teilnehmer(&alpha, &a),
            "Hoechstens ein Raum pro Verbindung"
        );
        assert!(registry.ist_teilnehmer(&beta, &a));

        // Der Zurueckbleibende wird wie bei einer Trennung benachrichtigt
        let events_b = alle_events(&mut rx_b);
        assert!(matches!(events_b.as_slice(), [SignalEvent::PeerLeft { id }] if *id == a));

        // Ein Broadcast im alten Raum erreicht den Gewechselten nicht mehr
        registry.relay(&alpha, b, RelayArt::Message, None, json!("hallo"));
        assert!(alle_events(&mut rx_a).is_empty(), "A gehoert nicht mehr zu alpha");

        // Verlaesst der Letzte den Raum per Wechsel, wird er evakuiert
        assert!(registry.beitreten(&beta, b));
        assert_eq!(registry.raum_anzahl(), 1, "alpha ist evakuiert");
        assert_eq!(registry.teilnehmer(&beta), vec![a, b]);
    }

    #[tokio::test]
    async fn gezieltes_relay_erreicht_nur_das_ziel() {
        let registry = SessionRegistry::neu();
        let raum = RaumId::neu("lobby");

        let (a, _rx_a) = beigetreten(&registry, &raum);
        let (_b, mut rx_b) = beigetreten(&registry, &raum);
        let (c, mut rx_c) = beigetreten(&registry, &raum);
        alle_events(&mut rx_b);
        alle_events(&mut rx_c);

        let zugestellt = registry.relay(&raum, a, RelayArt::Offer, Some(c), json!({ "sdp": "x" }));
        assert_eq!(zugestellt, 1);

        assert!(alle_events(&mut rx_b).is_empty(), "B darf das Offer nicht sehen");
        let events_c = alle_events(&mut rx_c);
        assert!(
            matches!(events_c.as_slice(), [SignalEvent::Offer { sender, .. }] if *sender == a)
        );
    }

    #[tokio::test]
    async fn broadcast_relay_ohne_echo() {
        let registry = SessionRegistry::neu();
        let raum = RaumId::neu("lobby");

        let (a, mut rx_a) = beigetreten(&registry, &raum);
        let (_b, mut rx_b) = beigetreten(&registry, &raum);
        let (_c, mut rx_c) = beigetreten(&registry, &raum);
        alle_events(&mut rx_a);
        alle_events(&mut rx_b);
        alle_events(&mut rx_c);

        let zugestellt = registry.relay(&raum, a, RelayArt::Message, None, json!("hallo"));
        assert_eq!(zugestellt, 2, "B und C empfangen, A nicht");

        assert!(alle_events(&mut rx_a).is_empty(), "Kein Echo an den Absender");
        assert_eq!(alle_events(&mut rx_b).len(), 1);
        assert_eq!(alle_events(&mut rx_c).len(), 1);
    }

    #[tokio::test]
    async fn relay_diagnosen_verwerfen_das_event() {
        let registry = SessionRegistry::neu();
        let raum = RaumId::neu("lobby");

        let (a, _rx_a) = beigetreten(&registry, &raum);
        let fremder = VerbindungsId::neu();

        // Unbekanntes Ziel
        assert_eq!(
            registry.relay(&raum, a, RelayArt::Offer, Some(fremder), json!({})),
            0
        );
        // Absender ist kein Teilnehmer
        assert_eq!(
            registry.relay(&raum, fremder, RelayArt::Offer, None, json!({})),
            0
        );
        // Unbekannter Raum
        assert_eq!(
            registry.relay(&RaumId::neu("fehlt"), a, RelayArt::Offer, None, json!({})),
            0
        );
    }

    #[tokio::test]
    async fn trennen_ist_idempotent_und_benachrichtigt() {
        let registry = SessionRegistry::neu();
        let raum = RaumId::neu("lobby");

        let (a, _rx_a) = beigetreten(&registry, &raum);
        let (_b, mut rx_b) = beigetreten(&registry, &raum);
        alle_events(&mut rx_b);

        registry.trennen(a);
        assert_eq!(registry.teilnehmer(&raum).len(), 1);
        let events_b = alle_events(&mut rx_b);
        assert!(matches!(events_b.as_slice(), [SignalEvent::PeerLeft { id }] if *id == a));

        // Zweiter Aufruf aendert nichts mehr
        registry.trennen(a);
        assert_eq!(registry.teilnehmer(&raum).len(), 1);
        assert!(alle_events(&mut rx_b).is_empty());
    }

    #[tokio::test]
    async fn leerer_raum_wird_evakuiert_und_neu_geboren() {
        let registry = SessionRegistry::neu();
        let raum = RaumId::neu("lobby");

        let (a, _rx_a) = beigetreten(&registry, &raum);
        let (b, _rx_b) = beigetreten(&registry, &raum);

        registry.trennen(a);
        assert_eq!(registry.raum_anzahl(), 1);
        registry.trennen(b);
        assert_eq!(registry.raum_anzahl(), 0, "Letzter Teilnehmer evakuiert den Raum");

        // Erneuter Join erzeugt einen frischen Raum ohne Vorgeschichte
        let (neu, mut rx_neu) = beigetreten(&registry, &raum);
        assert_eq!(registry.teilnehmer(&raum), vec![neu]);
        assert!(alle_events(&mut rx_neu).is_empty(), "Keine Vorstellung im frischen Raum");
    }

    #[tokio::test]
    async fn clone_teilt_inneren_zustand() {
        let registry = SessionRegistry::neu();
        let kopie = registry.clone();
        let raum = RaumId::neu("lobby");

        let (_a, _rx) = beigetreten(&registry, &raum);
        assert_eq!(kopie.teilnehmer(&raum).len(), 1);
        assert_eq!(kopie.verbindungs_anzahl(), 1);
    }
}
