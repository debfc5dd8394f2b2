use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;
use uuid::Uuid;

// Capacidade do buffer por tópico. Assinantes lentos perdem eventos antigos,
// nunca travam quem publica.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// Evento de mudança publicado pelos services após cada escrita e
/// retransmitido aos dashboards conectados via SSE.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    #[schema(example = "client")]
    pub entity: &'static str,
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, entity: &'static str, id: Uuid) -> Self {
        Self {
            kind,
            entity,
            id,
            team_id: None,
        }
    }

    pub fn for_team(mut self, team_id: Option<Uuid>) -> Self {
        self.team_id = team_id;
        self
    }
}

/// Barramento de eventos em memória: um canal broadcast por tópico.
#[derive(Clone)]
pub struct EventBus {
    clients: broadcast::Sender<ChangeEvent>,
    jobs: broadcast::Sender<ChangeEvent>,
    leads: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (clients, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (jobs, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (leads, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            clients,
            jobs,
            leads,
        }
    }

    // Publicar sem assinantes não é erro: o dashboard pode estar fechado.
    pub fn publish_client(&self, event: ChangeEvent) {
        let _ = self.clients.send(event);
    }

    pub fn publish_job(&self, event: ChangeEvent) {
        let _ = self.jobs.send(event);
    }

    pub fn publish_lead(&self, event: ChangeEvent) {
        let _ = self.leads.send(event);
    }

    pub fn subscribe_clients(&self) -> broadcast::Receiver<ChangeEvent> {
        self.clients.subscribe()
    }

    pub fn subscribe_jobs(&self) -> broadcast::Receiver<ChangeEvent> {
        self.jobs.subscribe()
    }

    pub fn subscribe_leads(&self) -> broadcast::Receiver<ChangeEvent> {
        self.leads.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publica_e_recebe_no_topico_certo() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_clients();

        bus.publish_client(ChangeEvent::new(ChangeKind::Created, "client", Uuid::new_v4()));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, ChangeKind::Created);
        assert_eq!(ev.entity, "client");
    }

    #[tokio::test]
    async fn publicar_sem_assinantes_nao_falha() {
        let bus = EventBus::new();
        bus.publish_lead(ChangeEvent::new(ChangeKind::Deleted, "orcamento_request", Uuid::new_v4()));
    }

    #[tokio::test]
    async fn evento_de_equipe_carrega_team_id() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_jobs();
        let team = Uuid::new_v4();

        bus.publish_job(ChangeEvent::new(ChangeKind::Updated, "job", Uuid::new_v4()).for_team(Some(team)));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.team_id, Some(team));
    }
}
