//! gobang-server – Bibliotheks-Root
//!
//! Verdrahtet Kontodienst, Matchmaking, Raum-Verwaltung und die
//! TCP-Sitzungsschicht zu einem lauffaehigen Server.

pub mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;

use gobang_accounts::MemoryAccountStore;
use gobang_core::types::{Grade, Spieler, UserId};
use gobang_match::{EscalationSweeper, SystemUhr};
use gobang_room::ZufallsMuenze;
use gobang_session::{GameServer, SessionState};

use config::ServerConfig;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Konten in den In-Memory-Kontodienst laden
    /// 2. Spiellogik-Komponenten verdrahten
    /// 3. Sweeper-Intervall-Task starten
    /// 4. TCP-Listener starten und auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            tcp = %self.config.tcp_bind_adresse(),
            "Server startet"
        );

        // Kontodienst befuellen
        let konten = MemoryAccountStore::neu();
        for eintrag in &self.config.konten {
            let grade = Grade::neu(eintrag.grade)
                .with_context(|| format!("Konto '{}' hat ungueltigen Grade", eintrag.username))?;
            konten.einfuegen(Spieler {
                user_id: UserId::new(),
                username: eintrag.username.clone(),
                nickname: eintrag.nickname.clone(),
                grade,
                profile_image: eintrag.profile_image.clone(),
            });
        }
        tracing::info!(anzahl = konten.anzahl(), "Konten geladen");

        // Spiellogik verdrahten
        let uhr = SystemUhr;
        let state = SessionState::neu(Arc::new(konten), ZufallsMuenze, uhr);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        // Sweeper-Intervall-Task
        let sweeper = EscalationSweeper::neu(
            Arc::clone(&state.queue),
            state.raeume.clone(),
            state.verbindungen.clone(),
            uhr,
            self.config.matchmaking.clone(),
        );
        let intervall = self.config.matchmaking.sweep_intervall();
        let mut sweep_shutdown = shutdown_rx.clone();
        tokio::spawn(async move {
            let mut takt = tokio::time::interval(intervall);
            loop {
                tokio::select! {
                    _ = takt.tick() => sweeper.tick(),
                    Ok(()) = sweep_shutdown.changed() => {
                        if *sweep_shutdown.borrow() {
                            tracing::debug!("Sweeper-Task beendet");
                            break;
                        }
                    }
                }
            }
        });

        // Ctrl-C loest den Shutdown aus
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
                let _ = shutdown_tx.send(true);
            }
        });

        // TCP-Listener (blockiert bis zum Shutdown)
        let bind_addr = self
            .config
            .tcp_bind_adresse()
            .parse()
            .with_context(|| format!("Ungueltige Bind-Adresse '{}'", self.config.tcp_bind_adresse()))?;
        let server = GameServer::neu(Arc::clone(&state), bind_addr);
        server.starten(shutdown_rx).await?;

        tracing::info!(uptime_sek = state.uptime_sek(), "Server beendet");
        Ok(())
    }
}
