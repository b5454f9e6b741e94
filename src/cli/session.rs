use anyhow::Result;
use rust_decimal::Decimal;

use crate::account::{format_amount, parse_amount, Bank, OperationError};
use crate::cli::utils::{
    print_error, print_header, print_success, prompt_repeat_or_back, read_line, read_password,
    Flow,
};
use crate::config;
use crate::storage::csv_store::{CsvAccountStore, CsvTransactionStore};
use crate::storage::{AccountRepository, TransactionRepository};
use crate::user::{authenticate, register_user, PlaintextVerifier, RegistrationError};

/// Run the interactive session until the user exits.
pub fn run() -> Result<()> {
    let config = config::get_config();
    let mut bank = Bank::new(
        CsvAccountStore::new(config.storage.accounts_path()),
        CsvTransactionStore::new(config.storage.transactions_path()),
    );

    loop {
        print_header(&config.app_name);
        println!("1. Register");
        println!("2. Login");
        println!("3. Exit");

        let choice = read_line("Choose an option (1-3): ")?;
        match choice.as_str() {
            "1" => register_flow(&mut bank)?,
            "2" => {
                if let Some(username) = login_flow(&bank)? {
                    account_menu(&mut bank, &username)?;
                }
            }
            "3" => {
                println!("Goodbye!");
                return Ok(());
            }
            _ => println!("Invalid option. Please choose 1-3."),
        }
    }
}

fn register_flow<A, T>(bank: &mut Bank<A, T>) -> Result<()>
where
    A: AccountRepository,
    T: TransactionRepository,
{
    print_header("Register");
    let username = read_line("Choose a username: ")?;
    if username.is_empty() {
        print_error("Username cannot be empty.");
        return Ok(());
    }
    if bank.accounts().exists(&username)? {
        print_error("Username already exists. Please choose another.");
        return Ok(());
    }

    let password = read_password("Choose a password: ")?;
    match register_user(bank.accounts_mut(), &username, &password) {
        Ok(account) => print_success(format!(
            "Account created for {}. You can now log in.",
            account.username
        )),
        Err(RegistrationError::Storage(err)) => return Err(err.into()),
        Err(err) => print_error(err),
    }
    Ok(())
}

fn login_flow<A, T>(bank: &Bank<A, T>) -> Result<Option<String>>
where
    A: AccountRepository,
    T: TransactionRepository,
{
    print_header("Login");
    let username = read_line("Username: ")?;
    let password = read_password("Password: ")?;
    match authenticate(bank.accounts(), &PlaintextVerifier, &username, &password)? {
        Some(account) => {
            println!("Welcome back, {}!", account.username);
            Ok(Some(account.username))
        }
        None => {
            print_error("Invalid credentials. Please try again.");
            Ok(None)
        }
    }
}

fn account_menu<A, T>(bank: &mut Bank<A, T>, username: &str) -> Result<()>
where
    A: AccountRepository,
    T: TransactionRepository,
{
    let app_name = config::get_config().app_name;
    loop {
        print_header(&app_name);
        println!("1. Deposit");
        println!("2. Withdraw");
        println!("3. Transfer");
        println!("4. Check Balance");
        println!("5. Transaction History");
        println!("6. Logout");

        let choice = read_line("Choose an option (1-6): ")?;
        match choice.as_str() {
            "1" => deposit_flow(bank, username)?,
            "2" => withdraw_flow(bank, username)?,
            "3" => transfer_flow(bank, username)?,
            "4" => balance_flow(bank, username)?,
            "5" => history_flow(bank, username)?,
            "6" => {
                println!("Logging out...\n");
                return Ok(());
            }
            _ => println!("Invalid option. Please choose 1-6."),
        }
    }
}

/// Domain failures are printed and re-prompted; storage failures abort.
fn report(err: OperationError) -> Result<()> {
    match err {
        OperationError::Storage(err) => Err(err.into()),
        err => {
            print_error(err);
            Ok(())
        }
    }
}

fn read_amount(prompt: &str, max_amount: Decimal) -> Result<Option<Decimal>> {
    let raw = read_line(prompt)?;
    match parse_amount(&raw, max_amount) {
        Ok(amount) => Ok(Some(amount)),
        Err(err) => {
            print_error(err);
            Ok(None)
        }
    }
}

fn deposit_flow<A, T>(bank: &mut Bank<A, T>, username: &str) -> Result<()>
where
    A: AccountRepository,
    T: TransactionRepository,
{
    let max_amount = config::get_config().limits.max_amount;
    loop {
        print_header("Deposit");
        let amount = match read_amount("Enter amount to deposit: ", max_amount)? {
            Some(amount) => amount,
            None => {
                if prompt_repeat_or_back("deposit", true)? == Flow::Back {
                    return Ok(());
                }
                continue;
            }
        };

        match bank.deposit(username, amount) {
            Ok(receipt) => print_success(format!(
                "Deposited {}. New balance: {}.",
                format_amount(receipt.amount),
                format_amount(receipt.balance)
            )),
            Err(err) => {
                report(err)?;
                if prompt_repeat_or_back("deposit", true)? == Flow::Back {
                    return Ok(());
                }
                continue;
            }
        }

        if prompt_repeat_or_back("deposit", true)? == Flow::Back {
            return Ok(());
        }
    }
}

fn withdraw_flow<A, T>(bank: &mut Bank<A, T>, username: &str) -> Result<()>
where
    A: AccountRepository,
    T: TransactionRepository,
{
    let max_amount = config::get_config().limits.max_amount;
    loop {
        print_header("Withdraw");
        let amount = match read_amount("Enter amount to withdraw: ", max_amount)? {
            Some(amount) => amount,
            None => {
                if prompt_repeat_or_back("withdraw", true)? == Flow::Back {
                    return Ok(());
                }
                continue;
            }
        };

        match bank.withdraw(username, amount) {
            Ok(receipt) => print_success(format!(
                "Withdrew {}. New balance: {}.",
                format_amount(receipt.amount),
                format_amount(receipt.balance)
            )),
            Err(err) => {
                report(err)?;
                if prompt_repeat_or_back("withdraw", true)? == Flow::Back {
                    return Ok(());
                }
                continue;
            }
        }

        if prompt_repeat_or_back("withdraw", true)? == Flow::Back {
            return Ok(());
        }
    }
}

fn transfer_flow<A, T>(bank: &mut Bank<A, T>, username: &str) -> Result<()>
where
    A: AccountRepository,
    T: TransactionRepository,
{
    let max_amount = config::get_config().limits.max_amount;
    loop {
        print_header("Transfer");
        let recipient = read_line("Enter recipient username: ")?;
        if recipient == username {
            print_error("You cannot transfer to yourself.");
            if prompt_repeat_or_back("transfer", true)? == Flow::Back {
                return Ok(());
            }
            continue;
        }
        if !bank.accounts().exists(&recipient)? {
            print_error("Recipient does not exist.");
            if prompt_repeat_or_back("transfer", true)? == Flow::Back {
                return Ok(());
            }
            continue;
        }

        let amount = match read_amount("Enter amount to transfer: ", max_amount)? {
            Some(amount) => amount,
            None => {
                if prompt_repeat_or_back("transfer", true)? == Flow::Back {
                    return Ok(());
                }
                continue;
            }
        };

        match bank.transfer(username, &recipient, amount) {
            Ok(receipt) => print_success(format!(
                "Transferred {} to {}. Your new balance: {}.",
                format_amount(receipt.amount),
                recipient,
                format_amount(receipt.sender_balance)
            )),
            Err(err) => {
                report(err)?;
                if prompt_repeat_or_back("transfer", true)? == Flow::Back {
                    return Ok(());
                }
                continue;
            }
        }

        if prompt_repeat_or_back("transfer", true)? == Flow::Back {
            return Ok(());
        }
    }
}

fn balance_flow<A, T>(bank: &Bank<A, T>, username: &str) -> Result<()>
where
    A: AccountRepository,
    T: TransactionRepository,
{
    let balance = bank.balance(username)?;
    println!("\nCurrent balance: {}", format_amount(balance));
    prompt_repeat_or_back("check balance", false)?;
    Ok(())
}

fn history_flow<A, T>(bank: &Bank<A, T>, username: &str) -> Result<()>
where
    A: AccountRepository,
    T: TransactionRepository,
{
    print_header("Transaction History");
    let records = bank.history(username)?;
    if records.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!(
        "{:<19} | {:<12} | {:<10} | {:<10} | Details",
        "Date", "Type", "Amount", "Balance"
    );
    println!("{}", "-".repeat(70));
    for tx in &records {
        println!(
            "{:<19} | {:<12} | {:<10} | {:<10} | {}",
            tx.date,
            tx.kind.as_str(),
            format_amount(tx.amount),
            format_amount(tx.balance),
            tx.details
        );
    }

    prompt_repeat_or_back("view transactions", false)?;
    Ok(())
}
