use anyhow::{Context, bail};

pub(crate) const DEFAULT_SAMPLE_CODES: usize = 5;

pub(crate) const USAGE: &str = "\
usage: greenchain <command>

commands:
  status                   show the saved wallet session
  connect                  authorize the configured wallet and save a session
  disconnect               forget the saved session
  balance                  show token and donation-credit balances
  claim <code>             redeem a greenchain-claim-... code
  ngos                     list NGOs accepting donations
  convert <amount>         convert tokens into donation credits
  donate <ngo> <amount>    donate credits to an NGO address
  sample-codes [n]         print fresh claim codes for testing";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Status,
    Connect,
    Disconnect,
    Balance,
    Claim(String),
    Ngos,
    Convert(u64),
    Donate { ngo_address: String, amount: u64 },
    SampleCodes(usize),
    Help,
}

impl Command {
    pub(crate) fn parse<I, S>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        let words: Vec<&str> = args.iter().map(String::as_str).collect();

        let command = match words.as_slice() {
            [] | ["help"] | ["-h"] | ["--help"] => Command::Help,
            ["status"] => Command::Status,
            ["connect"] => Command::Connect,
            ["disconnect"] => Command::Disconnect,
            ["balance"] => Command::Balance,
            ["claim", code] => Command::Claim((*code).to_owned()),
            ["ngos"] => Command::Ngos,
            ["convert", amount] => Command::Convert(parse_amount(amount)?),
            ["donate", ngo, amount] => Command::Donate {
                ngo_address: (*ngo).to_owned(),
                amount: parse_amount(amount)?,
            },
            ["sample-codes"] => Command::SampleCodes(DEFAULT_SAMPLE_CODES),
            ["sample-codes", count] => Command::SampleCodes(
                count
                    .parse()
                    .with_context(|| format!("invalid code count: {count}"))?,
            ),
            [other, ..] => bail!("unknown or malformed command: {other}\n\n{USAGE}"),
        };
        Ok(command)
    }
}

fn parse_amount(raw: &str) -> anyhow::Result<u64> {
    raw.trim()
        .parse()
        .with_context(|| format!("amount must be a whole number, got {raw:?}"))
}
