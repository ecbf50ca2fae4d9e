use tracing::{error, info};

use crate::chain::build_chain;
use crate::chat::run_session;
use crate::config::Config;
use crate::ingest::ingest_pdf;
use crate::{RagError, Result};

/// Ingest the configured PDF into the vector store. A missing PDF is
/// reported on stdout and the command returns successfully, making no
/// network or database calls.
#[inline]
pub async fn run_ingest(config: &Config) -> Result<()> {
    match ingest_pdf(config).await {
        Ok(report) => {
            info!(
                "Ingestion finished: {} pages, {} chunks",
                report.pages, report.chunks
            );
            println!(
                "Successfully ingested {} chunks into PostgreSQL.",
                report.chunks
            );
            Ok(())
        }
        Err(RagError::PdfNotFound(path)) => {
            println!("Error: PDF file not found at {}", path.display());
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Build the retrieval chain and run the interactive session over
/// stdin/stdout. A construction failure prints a diagnostic checklist and
/// returns without entering the loop.
#[inline]
pub async fn run_chat(config: &Config) -> Result<()> {
    println!("{}", "=".repeat(50));
    println!("        BEM-VINDO AO CHAT DO DESAFIO RAG");
    println!("{}", "=".repeat(50));
    println!("Iniciando sistema... Por favor, aguarde.");

    let chain = match build_chain(config).await {
        Ok(chain) => chain,
        Err(e) => {
            error!("Failed to build retrieval chain: {e}");
            println!("\n[ERRO] Não foi possível iniciar o chat: {e}");
            println!("Certifique-se de que:");
            println!("1. O banco de dados está rodando (docker-compose up -d)");
            println!("2. O arquivo .env está configurado com as chaves de API");
            println!("3. Você já rodou a ingestão (ragchat ingest)");
            return Ok(());
        }
    };

    println!("\n[PRONTO] Sistema carregado com sucesso!");
    println!("Digite sua pergunta abaixo ou 'sair' para encerrar.");
    println!("{}", "-".repeat(50));

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_session(&chain, stdin.lock(), stdout.lock()).await?;

    Ok(())
}
