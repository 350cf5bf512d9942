use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use super::{Command, InputArgs, KekArgs, OutputArgs, UpdateArgs};
use crate::application_service::keyset_service::{KeysetService, ProtectedKeysetCodec};
use crate::config::KeysetConfig;
use crate::domain::{Aead, EnvelopeCodec, KeyId, Keyset, KeysetError};
use crate::infrastructure::keyset_file;
use crate::infrastructure::{
    BinaryWireCodec, BuiltinKeyManager, BuiltinTemplateCatalog, KmsResolver,
    RandomKeyIdGenerator,
};

type BuiltinKeysetService =
    KeysetService<BuiltinTemplateCatalog, BuiltinKeyManager, RandomKeyIdGenerator>;

/// Runs one command. Tables and listings go to `out`; keysets go to `--out`
/// or standard output.
pub fn run<W: Write>(command: Command, config: &KeysetConfig, out: &mut W) -> Result<()> {
    let app = App::new(config);

    match command {
        Command::AddKey { io, key_template } => {
            app.update(&io, |keyset| {
                let added = app.service.add_key(keyset, &key_template)?;
                Ok(added.keyset)
            })
        }
        Command::CreateKeyset {
            kek,
            output,
            key_template,
        } => {
            let template = key_template.unwrap_or_else(|| config.key_template.clone());
            app.create(&kek, &output, &template)
        }
        Command::CreatePublicKeyset { io } => {
            app.update(&io, |keyset| app.service.create_public_keyset(keyset))
        }
        Command::DeleteKey(args) => app.update(&args.io, |keyset| {
            app.service.delete_key(keyset, key_id(args.key_id)?)
        }),
        Command::DisableKey(args) => app.update(&args.io, |keyset| {
            app.service.disable_key(keyset, key_id(args.key_id)?)
        }),
        Command::EnableKey(args) => app.update(&args.io, |keyset| {
            app.service.enable_key(keyset, key_id(args.key_id)?)
        }),
        Command::PromoteKey(args) => app.update(&args.io, |keyset| {
            app.service.promote_key(keyset, key_id(args.key_id)?)
        }),
        Command::ListKeyset { input, kek } => app.list_keyset(&input, &kek, out),
        Command::ListKeyTemplates => {
            writeln!(out, "The following key template names are recognized:")?;
            for name in app.service.template_names() {
                writeln!(out, "  {name}")?;
            }
            Ok(())
        }
    }
}

fn key_id(raw: u32) -> Result<KeyId, KeysetError> {
    KeyId::new(raw).ok_or_else(|| KeysetError::InvalidTransition("key id 0 is reserved".into()))
}

struct App<'a> {
    config: &'a KeysetConfig,
    service: BuiltinKeysetService,
    protected: ProtectedKeysetCodec<BinaryWireCodec>,
    resolver: KmsResolver,
}

impl<'a> App<'a> {
    fn new(config: &'a KeysetConfig) -> Self {
        Self {
            config,
            service: KeysetService {
                templates: BuiltinTemplateCatalog,
                key_factory: BuiltinKeyManager,
                key_ids: RandomKeyIdGenerator,
            },
            protected: ProtectedKeysetCodec::new(
                BinaryWireCodec,
                EnvelopeCodec::with_associated_data(config.associated_data.as_bytes()),
            ),
            resolver: KmsResolver::with_builtin_clients(),
        }
    }

    fn create(&self, kek_args: &KekArgs, output: &OutputArgs, template: &str) -> Result<()> {
        validate_kek(kek_args)?;
        validate_output(output)?;

        let kek = self.kek(kek_args)?;
        let created = self
            .service
            .create_keyset(template)
            .context("failed to create keyset")?;
        info!(key_id = created.key_id.value(), template, "created keyset");

        self.write(&created.keyset, output, kek.as_ref())
    }

    /// One read, mutate, write cycle. Nothing is written unless every step succeeds.
    fn update<F>(&self, io: &UpdateArgs, mutate: F) -> Result<()>
    where
        F: FnOnce(&Keyset) -> Result<Keyset, KeysetError>,
    {
        validate_input(&io.input)?;
        validate_kek(&io.kek)?;
        validate_output(&io.output)?;

        let kek = self.kek(&io.kek)?;
        let keyset = self.read(&io.input, kek.as_ref())?;
        let next = mutate(&keyset).context("failed to update keyset")?;
        self.write(&next, &io.output, kek.as_ref())
    }

    fn list_keyset<W: Write>(&self, input: &InputArgs, kek_args: &KekArgs, out: &mut W) -> Result<()> {
        validate_input(input)?;
        validate_kek(kek_args)?;

        let kek = self.kek(kek_args)?;
        let keyset = self.read(input, kek.as_ref())?;

        writeln!(out, "{:>12} {:>9} {:>9}", "Key ID", "Status", "Primary")?;
        for row in self.service.list_keyset(&keyset) {
            writeln!(
                out,
                "{:>12} {:>9} {:>9}",
                row.key_id.value(),
                row.status.to_string(),
                row.is_primary
            )?;
        }
        Ok(())
    }

    fn kek(&self, args: &KekArgs) -> Result<Box<dyn Aead>> {
        self.resolver
            .resolve(args.master_key_uri.as_deref(), args.credential.as_deref())
            .context("failed to get KEK")
    }

    fn read(&self, input: &InputArgs, kek: &dyn Aead) -> Result<Keyset> {
        let format = input.in_format.unwrap_or(self.config.in_format);
        let bytes = keyset_file::read_input(input.input.as_deref())?;
        self.protected
            .read(&bytes, format.codec(), kek)
            .with_context(|| format!("failed to read {format} keyset"))
    }

    fn write(&self, keyset: &Keyset, output: &OutputArgs, kek: &dyn Aead) -> Result<()> {
        let format = output.out_format.unwrap_or(self.config.out_format);
        let bytes = self
            .protected
            .write(keyset, format.codec(), kek)
            .with_context(|| format!("failed to write {format} keyset"))?;
        keyset_file::write_output(output.out.as_deref(), &bytes)?;
        Ok(())
    }
}

fn validate_input(input: &InputArgs) -> Result<()> {
    if let Some(path) = &input.input {
        keyset_file::validate_input(path)?;
    }
    Ok(())
}

fn validate_kek(kek: &KekArgs) -> Result<()> {
    if let Some(path) = &kek.credential {
        keyset_file::validate_credential(path)?;
    }
    Ok(())
}

fn validate_output(output: &OutputArgs) -> Result<()> {
    if let Some(path) = &output.out {
        keyset_file::validate_output(path)?;
    }
    Ok(())
}
